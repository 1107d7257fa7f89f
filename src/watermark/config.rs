//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调参数”集中到 `WatermarkConfig`，避免在合成代码中散落魔法数字
//! （logo 尺寸、右下角偏移、预览最大边长等）。
//! 预览档位（quality / balanced / speed）作为高层语义，映射到缩放滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供默认布局（20x20 logo、偏移 100/130、预览 600）。
//! - `PreviewProfile` 负责档位字符串解析与反向输出。
//! - `WatermarkSettings` 是可序列化的用户可编辑子集，写入前做范围校验。

use std::path::PathBuf;

use image::imageops::FilterType;

use super::WatermarkError;

/// 默认 logo 路径（相对当前工作目录）。
pub const DEFAULT_LOGO_PATH: &str = "logo.png";

/// 默认 logo 目标尺寸，缩放时不保持宽高比。
pub const DEFAULT_LOGO_SIZE: (u32, u32) = (20, 20);

/// 水印左上角距离底图右边缘的像素数。
pub const DEFAULT_OFFSET_RIGHT: u32 = 100;

/// 水印左上角距离底图下边缘的像素数。
pub const DEFAULT_OFFSET_BOTTOM: u32 = 130;

/// 预览区域最大边长。
pub const DEFAULT_DISPLAY_MAX_DIMENSION: u32 = 600;

const MIN_DISPLAY_DIMENSION: u32 = 16;
const MAX_DISPLAY_DIMENSION: u32 = 8192;
const MAX_OFFSET: u32 = 100_000;
const MAX_LOGO_DIMENSION: u32 = 4096;

/// 水印处理配置。
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// logo 图片路径。
    pub logo_path: PathBuf,
    /// logo 缩放后的固定尺寸（宽, 高）。
    pub logo_size: (u32, u32),
    /// 偏移：`x = base_width - offset_right`。
    pub offset_right: u32,
    /// 偏移：`y = base_height - offset_bottom`。
    pub offset_bottom: u32,
    /// 预览缩放后较长边的长度。
    pub display_max_dimension: u32,
    /// logo 与预览缩放使用的滤镜。
    pub resize_filter: FilterType,
    /// 读取原始文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            logo_size: DEFAULT_LOGO_SIZE,
            offset_right: DEFAULT_OFFSET_RIGHT,
            offset_bottom: DEFAULT_OFFSET_BOTTOM,
            display_max_dimension: DEFAULT_DISPLAY_MAX_DIMENSION,
            resize_filter: FilterType::Triangle,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
        }
    }
}

/// 预览缩放档位。
///
/// - `Quality`：Lanczos3，最清晰
/// - `Balanced`：Triangle（默认）
/// - `Speed`：Nearest，最快
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewProfile {
    Quality,
    Balanced,
    Speed,
}

impl PreviewProfile {
    /// 从外部字符串解析档位。
    pub(crate) fn from_str(profile: &str) -> Result<Self, WatermarkError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(WatermarkError::ResourceLimit(format!(
                "未知预览档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

/// 用户可编辑的配置子集，以 JSON 形式在 UI 层与服务层之间交换。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WatermarkSettings {
    pub logo_path: String,
    pub logo_width: u32,
    pub logo_height: u32,
    pub offset_right: u32,
    pub offset_bottom: u32,
    pub display_max_dimension: u32,
}

impl WatermarkConfig {
    /// 基于当前滤镜反推预览档位。
    pub(crate) fn infer_preview_profile(&self) -> PreviewProfile {
        match self.resize_filter {
            FilterType::Lanczos3 | FilterType::CatmullRom => PreviewProfile::Quality,
            FilterType::Nearest => PreviewProfile::Speed,
            FilterType::Triangle | FilterType::Gaussian => PreviewProfile::Balanced,
        }
    }

    pub(crate) fn apply_preview_profile(&mut self, profile: PreviewProfile) {
        self.resize_filter = match profile {
            PreviewProfile::Quality => FilterType::Lanczos3,
            PreviewProfile::Balanced => FilterType::Triangle,
            PreviewProfile::Speed => FilterType::Nearest,
        };
    }

    /// 导出用户可编辑子集。
    pub(crate) fn settings(&self) -> WatermarkSettings {
        WatermarkSettings {
            logo_path: self.logo_path.to_string_lossy().to_string(),
            logo_width: self.logo_size.0,
            logo_height: self.logo_size.1,
            offset_right: self.offset_right,
            offset_bottom: self.offset_bottom,
            display_max_dimension: self.display_max_dimension,
        }
    }

    /// 校验并应用用户设置；校验失败时配置保持不变。
    pub(crate) fn apply_settings(
        &mut self,
        settings: &WatermarkSettings,
    ) -> Result<(), WatermarkError> {
        if !(1..=MAX_LOGO_DIMENSION).contains(&settings.logo_width)
            || !(1..=MAX_LOGO_DIMENSION).contains(&settings.logo_height)
        {
            return Err(WatermarkError::ResourceLimit(format!(
                "logo 尺寸必须在 1~{} 像素之间",
                MAX_LOGO_DIMENSION
            )));
        }
        let display_range = MIN_DISPLAY_DIMENSION..=MAX_DISPLAY_DIMENSION;
        if !display_range.contains(&settings.display_max_dimension) {
            return Err(WatermarkError::ResourceLimit(format!(
                "display_max_dimension 必须在 {}~{} 之间",
                MIN_DISPLAY_DIMENSION, MAX_DISPLAY_DIMENSION
            )));
        }
        if settings.offset_right > MAX_OFFSET || settings.offset_bottom > MAX_OFFSET {
            return Err(WatermarkError::ResourceLimit(format!(
                "水印偏移不能超过 {} 像素",
                MAX_OFFSET
            )));
        }

        self.logo_path = PathBuf::from(settings.logo_path.trim());
        self.logo_size = (settings.logo_width, settings.logo_height);
        self.offset_right = settings.offset_right;
        self.offset_bottom = settings.offset_bottom;
        self.display_max_dimension = settings.display_max_dimension;
        Ok(())
    }
}
