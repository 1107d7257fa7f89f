// 端到端测试：打开 -> 添加水印 -> 保存 -> 重新读取
use std::path::PathBuf;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
use image_watermark::watermark::commands;
use image_watermark::watermark::{WatermarkConfig, WatermarkServiceState};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("watermark-flow-{}-{}", std::process::id(), name))
}

fn write_base(name: &str, format: ImageFormat) -> PathBuf {
    let path = temp_path(name);
    let img = ImageBuffer::from_fn(320, 240, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
        .save_with_format(&path, format)
        .expect("failed to write base image");
    path
}

fn write_logo(name: &str) -> PathBuf {
    let path = temp_path(name);
    // 左半透明、右半不透明
    let img = ImageBuffer::from_fn(40, 40, |x, _| {
        if x < 20 { Rgba([0u8, 0, 255, 0]) } else { Rgba([0u8, 0, 255, 255]) }
    });
    DynamicImage::ImageRgba8(img)
        .save_with_format(&path, ImageFormat::Png)
        .expect("failed to write logo");
    path
}

fn service_with_logo(logo: &PathBuf) -> WatermarkServiceState {
    WatermarkServiceState::with_config(WatermarkConfig {
        logo_path: logo.clone(),
        resize_filter: image::imageops::FilterType::Nearest,
        ..WatermarkConfig::default()
    })
}

fn in_overlay(x: u32, y: u32) -> bool {
    (220..240).contains(&x) && (110..130).contains(&y)
}

#[test]
fn png_roundtrip_is_identical_outside_overlay() {
    let base = write_base("base.png", ImageFormat::Png);
    let logo = write_logo("logo.png");
    let out = temp_path("out.png");
    let state = service_with_logo(&logo);

    let preview = commands::browse_image(&state, Some(base.to_string_lossy().to_string()))
        .expect("open should succeed")
        .expect("not cancelled");
    assert_eq!((preview.width, preview.height), (600, 450));
    assert!(preview.has_alpha);
    assert!(!preview.watermarked);

    let preview = commands::add_watermark(&state).expect("watermark should succeed");
    assert!(preview.watermarked);

    let saved = commands::save_watermarked_image(&state, Some(out.to_string_lossy().to_string()))
        .expect("save should succeed");
    assert_eq!(saved.as_deref(), Some(out.as_path()));

    let original = image::open(&base).expect("reopen base").to_rgba8();
    let reloaded = image::open(&out).expect("reopen output").to_rgba8();
    assert_eq!(reloaded.dimensions(), original.dimensions());

    for (x, y, px) in reloaded.enumerate_pixels() {
        if !in_overlay(x, y) {
            assert_eq!(px, original.get_pixel(x, y), "pixel ({x}, {y}) changed");
        }
    }

    // logo 被缩放为 20x20：左半透明保留底图，右半为蓝色
    assert_eq!(reloaded.get_pixel(225, 115), original.get_pixel(225, 115));
    let blue = reloaded.get_pixel(235, 115).0;
    assert!(blue[0] <= 2 && blue[1] <= 2 && blue[2] >= 253 && blue[3] >= 253);

    for path in [&base, &logo, &out] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn jpeg_source_saved_as_jpeg_keeps_rgb_mode() {
    let base = write_base("base.jpg", ImageFormat::Jpeg);
    let logo = write_logo("logo-jpeg.png");
    let out = temp_path("out.jpeg");
    let state = service_with_logo(&logo);

    let preview = commands::browse_image(&state, Some(base.to_string_lossy().to_string()))
        .expect("open should succeed")
        .expect("not cancelled");
    assert!(!preview.has_alpha);

    commands::add_watermark(&state).expect("watermark should succeed");
    commands::save_watermarked_image(&state, Some(out.to_string_lossy().to_string()))
        .expect("save should succeed");

    let reloaded = image::open(&out).expect("reopen output");
    assert_eq!((reloaded.width(), reloaded.height()), (320, 240));

    for path in [&base, &logo, &out] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn png_result_cannot_be_saved_as_jpeg() {
    let base = write_base("base-alpha.png", ImageFormat::Png);
    let logo = write_logo("logo-alpha.png");
    let out = temp_path("out-alpha.jpg");
    let state = service_with_logo(&logo);

    commands::browse_image(&state, Some(base.to_string_lossy().to_string())).expect("open");
    commands::add_watermark(&state).expect("watermark");

    let err = commands::save_watermarked_image(&state, Some(out.to_string_lossy().to_string()))
        .expect_err("rgba to jpeg must fail");
    assert_eq!(err.code, "invalid_extension");
    assert!(!out.exists());

    for path in [&base, &logo] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn missing_logo_reports_overlay_not_found() {
    let base = write_base("base-nologo.png", ImageFormat::Png);
    let state = service_with_logo(&temp_path("does-not-exist.png"));

    commands::browse_image(&state, Some(base.to_string_lossy().to_string())).expect("open");
    let before = state.display_buffer().expect("lock");

    let err = commands::add_watermark(&state).expect_err("logo is missing");
    assert_eq!(err.code, "overlay_not_found");
    assert_eq!(state.display_buffer().expect("lock"), before);

    let err = commands::save_watermarked_image(&state, Some("never.png".into()))
        .expect_err("nothing composited");
    assert_eq!(err.code, "precondition");

    let _ = std::fs::remove_file(&base);
}

#[test]
fn corrupt_logo_reports_overlay_stage() {
    let base = write_base("base-badlogo.png", ImageFormat::Png);
    let logo = temp_path("bad-logo.png");
    std::fs::write(&logo, "not an image at all").expect("write garbage logo");
    let state = service_with_logo(&logo);

    commands::browse_image(&state, Some(base.to_string_lossy().to_string())).expect("open");
    let err = commands::add_watermark(&state).expect_err("logo cannot be decoded");
    assert_eq!(err.code, "overlay_not_found");
    assert_eq!(err.stage, "overlay");

    for path in [&base, &logo] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn failed_save_does_not_touch_target_path() {
    let base = write_base("base-exr.jpg", ImageFormat::Jpeg);
    let logo = write_logo("logo-exr.png");
    let out = temp_path("out.exr");
    let _ = std::fs::remove_file(&out);
    let state = service_with_logo(&logo);

    commands::browse_image(&state, Some(base.to_string_lossy().to_string())).expect("open");
    commands::add_watermark(&state).expect("watermark");

    let err = commands::save_watermarked_image(&state, Some(out.to_string_lossy().to_string()))
        .expect_err("rgb cannot be written as exr");
    assert_eq!(err.code, "invalid_extension");
    assert!(!out.exists());

    for path in [&base, &logo] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn opening_a_text_file_is_decode_error() {
    let path = temp_path("readme.jpg");
    std::fs::write(&path, "hello, not an image").expect("write text");
    let state = WatermarkServiceState::new();

    let err = commands::browse_image(&state, Some(path.to_string_lossy().to_string()))
        .expect_err("text is not an image");
    assert_eq!(err.code, "decode");

    let _ = std::fs::remove_file(&path);
}
