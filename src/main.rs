//! # 图片水印工具 — 应用入口
//!
//! 一个极简的交互式外壳，每行输入对应一次用户操作（相当于点击一个按钮）。
//! 业务逻辑全部在 `watermark` 模块中，这里只负责把结果映射为提示信息。

use std::io::{self, BufRead, Write};

use image_watermark::error::AppError;
use image_watermark::watermark::commands::{self, WatermarkCommandError};
use image_watermark::watermark::{PreviewInfo, WatermarkServiceState, suggested_file_name};

const HELP: &str = "\
可用命令：
  open <路径>         打开 JPEG / PNG / BMP 图片（不带路径视为取消）
  watermark           在当前图片上添加水印
  save <路径>         另存为（格式由扩展名决定，不带路径视为取消）
  logo <路径>         设置水印图片路径
  profile [档位]      查看或切换预览档位（quality / balanced / speed）
  settings [JSON]     查看或更新水印设置
  help                显示帮助
  quit                退出";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state = WatermarkServiceState::new();
    if let Err(err) = run(&state) {
        log::error!("交互外壳异常退出: {err}");
        std::process::exit(1);
    }
}

fn run(state: &WatermarkServiceState) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{HELP}");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, Some(rest.trim().to_string())),
            None => (line, None),
        };

        match command {
            "" => {}
            "open" => match commands::browse_image(state, argument) {
                Ok(Some(preview)) => show_preview("已打开", &preview),
                Ok(None) => {}
                Err(err) => show_warning(&err),
            },
            "watermark" => match commands::add_watermark(state) {
                Ok(preview) => show_preview("已添加水印", &preview),
                Err(err) => show_warning(&err),
            },
            "save" => match commands::save_watermarked_image(state, argument) {
                Ok(Some(path)) => println!("已保存到 {}", path.display()),
                Ok(None) => println!("已取消（可尝试：save {}）", suggested_file_name()),
                Err(err) => show_warning(&err),
            },
            "logo" => match argument {
                Some(path) => report(commands::set_logo_path(state, path)),
                None => println!("用法：logo <路径>"),
            },
            "profile" => match argument {
                Some(profile) => report(commands::set_preview_profile(state, profile)),
                None => match commands::get_preview_profile(state) {
                    Ok(profile) => println!("当前预览档位：{profile}"),
                    Err(err) => println!("[警告] {err}"),
                },
            },
            "settings" => match argument {
                Some(json) => report(commands::set_watermark_settings(state, &json)),
                None => match commands::get_watermark_settings(state) {
                    Ok(json) => println!("{json}"),
                    Err(err) => println!("[警告] {err}"),
                },
            },
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(()),
            other => println!("未知命令：{other}（输入 help 查看帮助）"),
        }
    }
}

fn show_preview(action: &str, preview: &PreviewInfo) {
    println!(
        "{action}：{}（预览 {}x{}{}{}）",
        preview.source_path,
        preview.width,
        preview.height,
        if preview.has_alpha { "，含透明通道" } else { "" },
        if preview.watermarked { "，已加水印" } else { "" },
    );
}

fn show_warning(err: &WatermarkCommandError) {
    println!("[警告] {}", err.message);
}

fn report(result: Result<(), AppError>) {
    match result {
        Ok(()) => println!("已更新"),
        Err(err) => println!("[警告] {err}"),
    }
}
