//! # 保存模块
//!
//! ## 设计思路
//!
//! 保存格式完全由用户输入的扩展名决定。扩展名缺失、无法识别、
//! 不支持写入，或与图片内容不匹配（例如带透明通道的图片保存为 JPEG），
//! 统一映射为 `InvalidExtension`，交给 UI 层提示用户，而不是让进程崩溃。

use std::io::Cursor;
use std::path::Path;

use chrono::Local;
use image::{DynamicImage, ImageFormat};

use super::{WatermarkError, WatermarkHandler};

impl WatermarkHandler {
    /// 将图片写入用户选择的完整路径。
    pub(super) fn write_image(
        &self,
        image: &DynamicImage,
        path: &Path,
    ) -> Result<(), WatermarkError> {
        let format = Self::target_format(path)?;

        if format == ImageFormat::Jpeg && image.color().has_alpha() {
            return Err(WatermarkError::InvalidExtension(format!(
                "带透明通道的图片无法保存为 JPEG：{}（请使用 .png）",
                path.display()
            )));
        }

        log::info!("💾 开始保存图片 - 路径: {} 格式: {:?}", path.display(), format);

        // 先在内存中完成编码，成功后再落盘，避免编码失败时截断已有文件
        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), format)
            .map_err(|e| match e {
                image::ImageError::Unsupported(inner) => WatermarkError::InvalidExtension(format!(
                    "图片内容无法以 {:?} 格式保存：{}",
                    format, inner
                )),
                other => WatermarkError::Encode(format!("图片编码失败：{}", other)),
            })?;

        std::fs::write(path, &encoded)
            .map_err(|e| WatermarkError::FileSystem(format!("写入文件失败：{}", e)))?;

        log::info!("✅ 图片已保存 - {}", path.display());
        Ok(())
    }

    fn target_format(path: &Path) -> Result<ImageFormat, WatermarkError> {
        let format = ImageFormat::from_path(path).map_err(|_| {
            WatermarkError::InvalidExtension(format!(
                "无法根据扩展名确定图片格式：{}",
                path.display()
            ))
        })?;

        if !format.writing_enabled() {
            return Err(WatermarkError::InvalidExtension(format!(
                "不支持保存为 {:?} 格式",
                format
            )));
        }

        Ok(format)
    }
}

/// 保存对话框的默认文件名。
pub fn suggested_file_name() -> String {
    format!("watermarked_{}.png", Local::now().format("%Y%m%d%H%M%S"))
}
