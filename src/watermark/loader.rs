//! # 加载模块
//!
//! ## 设计思路
//!
//! 负责把磁盘上的底图与 logo 读成内存图像，并在解码前完成安全校验：
//! 文件存在性、体积上限、文件签名（magic bytes）、像素上限。
//!
//! ## 实现思路
//!
//! - 底图：读取字节 → `infer` 校验签名 → 仅接受 PNG / JPEG / BMP →
//!   读 header 尺寸做像素限制 → 完整解码 → 按扩展名归一化。
//! - logo：路径为空、文件缺失、无法打开或无法解码统一映射为 `OverlayNotFound`，
//!   解码后强制转为 RGBA8。

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};

use super::pipeline::normalize;
use super::source::{LoadedImage, SourceFormat};
use super::{WatermarkConfig, WatermarkError, WatermarkHandler};

/// 打开对话框允许的底图格式。
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

impl WatermarkHandler {
    /// 从本地路径加载底图并按来源格式归一化。
    pub(super) fn load_from_file(
        &self,
        path: &Path,
        config: &WatermarkConfig,
    ) -> Result<LoadedImage, WatermarkError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.is_file() {
            return Err(WatermarkError::FileSystem(format!(
                "文件不存在：{}",
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| WatermarkError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(WatermarkError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| WatermarkError::FileSystem(format!("无法读取图片文件：{}", e)))?;

        let decoded = Self::decode_image(&bytes, config)?;
        let source_format = SourceFormat::from_path(path);
        let image = normalize(decoded, source_format);

        log::info!(
            "✅ 本地图片读取成功 - 尺寸: {}x{} 模式: {:?}",
            image.width(),
            image.height(),
            image.color()
        );

        Ok(LoadedImage {
            path: path.to_path_buf(),
            image,
        })
    }

    /// 加载水印 logo，并统一转换为 RGBA8。
    pub(super) fn load_overlay(
        &self,
        config: &WatermarkConfig,
    ) -> Result<DynamicImage, WatermarkError> {
        let path = config.logo_path.as_path();

        if path.as_os_str().is_empty() {
            return Err(WatermarkError::OverlayNotFound("未配置水印图片路径".to_string()));
        }

        if !path.is_file() {
            return Err(WatermarkError::OverlayNotFound(format!(
                "找不到水印图片：{}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            WatermarkError::OverlayNotFound(format!("无法打开水印图片 {}：{}", path.display(), e))
        })?;

        // 解码失败同样视为水印图片不可用
        let logo = Self::decode_image(&bytes, config).map_err(|e| {
            WatermarkError::OverlayNotFound(format!("水印图片无法使用 {}：{}", path.display(), e))
        })?;
        log::debug!(
            "🖼️ 水印图片已加载 - 原始尺寸: {}x{}",
            logo.width(),
            logo.height()
        );

        Ok(DynamicImage::ImageRgba8(logo.to_rgba8()))
    }

    /// 校验签名与像素上限后完整解码。
    fn decode_image(
        bytes: &[u8],
        config: &WatermarkConfig,
    ) -> Result<DynamicImage, WatermarkError> {
        Self::validate_image_signature(bytes)?;

        let format = image::guess_format(bytes)
            .map_err(|e| WatermarkError::Decode(format!("不支持的图片格式：{}", e)))?;

        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(WatermarkError::Decode(format!(
                "仅支持 PNG / JPEG / BMP，当前格式：{:?}",
                format
            )));
        }

        let (width, height) = Self::inspect_dimensions_from_memory(bytes)?;
        Self::validate_pixel_limits(config, width, height)?;

        image::load_from_memory_with_format(bytes, format)
            .map_err(|e| WatermarkError::Decode(format!("图片解码失败：{}", e)))
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), WatermarkError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| WatermarkError::Decode(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| WatermarkError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(
        config: &WatermarkConfig,
        width: u32,
        height: u32,
    ) -> Result<(), WatermarkError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| WatermarkError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(WatermarkError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), WatermarkError> {
        if bytes.is_empty() {
            return Err(WatermarkError::Decode("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| WatermarkError::Decode("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(WatermarkError::Decode(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}
