//! # 数据模型
//!
//! ## 设计思路
//!
//! 将“流水线中间结果”与“展示用数据”解耦：
//! - `SourceFormat` 表示按扩展名判断的来源格式（决定 RGB / RGBA 归一化）
//! - `LoadedImage` 表示已解码并归一化的底图
//! - `DisplayBuffer` 表示预览控件需要的平面化颜色 + 透明度数据
//! - `OverlayPlacement` 表示水印左上角坐标（允许为负）

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

/// 按文件扩展名识别的来源格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Other,
}

impl SourceFormat {
    /// 扩展名大小写不敏感；无扩展名或无法识别时视为 `Other`。
    pub fn from_path(path: &Path) -> Self {
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Png) => Self::Png,
            _ => Self::Other,
        }
    }
}

/// 加载阶段输出：解码并归一化后的底图。
pub(crate) struct LoadedImage {
    pub(crate) path: PathBuf,
    pub(crate) image: DynamicImage,
}

/// 预览控件使用的平面化像素数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    /// 图像宽度（像素）。
    pub width: u32,
    /// 图像高度（像素）。
    pub height: u32,
    /// RGB 交错字节（`width * height * 3`），已去除透明通道。
    pub color: Vec<u8>,
    /// 透明度平面（`width * height`），仅在源图含 alpha 时存在。
    pub alpha: Option<Vec<u8>>,
}

impl DisplayBuffer {
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }
}

/// 水印左上角在底图坐标系中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    pub x: i64,
    pub y: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a/b/photo.png")), SourceFormat::Png);
        assert_eq!(SourceFormat::from_path(Path::new("PHOTO.PNG")), SourceFormat::Png);
        assert_eq!(SourceFormat::from_path(Path::new("photo.jpg")), SourceFormat::Other);
        assert_eq!(SourceFormat::from_path(Path::new("photo")), SourceFormat::Other);
    }
}
