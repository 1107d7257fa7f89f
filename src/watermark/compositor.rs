//! # 合成模块
//!
//! ## 设计思路
//!
//! 将 logo 以自身 alpha 作为蒙版贴到底图副本上：
//! 透明像素不覆盖底图，不透明像素完全覆盖，半透明按比例混合。
//!
//! ## 实现思路
//!
//! - 位置固定为 `(W - offset_right, H - offset_bottom)`，使用 `i64` 计算且不做钳制。
//! - 超出底图范围（含负坐标）的 logo 像素直接裁掉。
//! - 底图为 RGBA 时，alpha 通道按同一公式混合；底图为 RGB 时只混合颜色。

use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Pixel, RgbaImage};

use super::pipeline::resize_exact;
use super::source::OverlayPlacement;
use super::{WatermarkConfig, WatermarkError};

/// 计算水印左上角位置。
pub fn overlay_position(
    base_width: u32,
    base_height: u32,
    config: &WatermarkConfig,
) -> OverlayPlacement {
    OverlayPlacement {
        x: base_width as i64 - config.offset_right as i64,
        y: base_height as i64 - config.offset_bottom as i64,
    }
}

/// 将 logo 缩放到固定尺寸后合成到底图副本上。
///
/// 返回的新图与底图尺寸、颜色模式一致。
pub fn composite(
    base: &DynamicImage,
    overlay: &DynamicImage,
    config: &WatermarkConfig,
) -> Result<DynamicImage, WatermarkError> {
    let (logo_width, logo_height) = config.logo_size;
    let logo = resize_exact(
        &DynamicImage::ImageRgba8(overlay.to_rgba8()),
        logo_width,
        logo_height,
        config.resize_filter,
    )?
    .to_rgba8();

    let placement = overlay_position(base.width(), base.height(), config);
    log::debug!(
        "🎯 水印位置: ({}, {}) logo 尺寸: {}x{}",
        placement.x,
        placement.y,
        logo_width,
        logo_height
    );

    let composited = match base {
        DynamicImage::ImageRgb8(img) => {
            let mut canvas = img.clone();
            paste_with_mask(&mut canvas, &logo, placement);
            DynamicImage::ImageRgb8(canvas)
        }
        DynamicImage::ImageRgba8(img) => {
            let mut canvas = img.clone();
            paste_with_mask(&mut canvas, &logo, placement);
            DynamicImage::ImageRgba8(canvas)
        }
        other if other.color().has_alpha() => {
            let mut canvas = other.to_rgba8();
            paste_with_mask(&mut canvas, &logo, placement);
            DynamicImage::ImageRgba8(canvas)
        }
        other => {
            let mut canvas = other.to_rgb8();
            paste_with_mask(&mut canvas, &logo, placement);
            DynamicImage::ImageRgb8(canvas)
        }
    };

    Ok(composited)
}

/// 以 `overlay` 的 alpha 作为蒙版贴图。
fn paste_with_mask<P>(base: &mut ImageBuffer<P, Vec<u8>>, overlay: &RgbaImage, at: OverlayPlacement)
where
    P: Pixel<Subpixel = u8>,
{
    let (base_width, base_height) = (base.width() as i64, base.height() as i64);

    for (ox, oy, src) in overlay.enumerate_pixels() {
        let tx = at.x + ox as i64;
        let ty = at.y + oy as i64;
        if tx < 0 || ty < 0 || tx >= base_width || ty >= base_height {
            continue;
        }

        let mask = src[3];
        if mask == 0 {
            continue;
        }

        let dst = base.get_pixel_mut(tx as u32, ty as u32);
        // RGB 底图只取前三个通道；RGBA 底图连同 alpha 一起混合
        for (d, s) in dst.channels_mut().iter_mut().zip(src.0.iter()) {
            *d = blend_channel(*s, *d, mask);
        }
    }
}

#[inline]
fn blend_channel(src: u8, dst: u8, mask: u8) -> u8 {
    let m = mask as u32;
    ((src as u32 * m + dst as u32 * (255 - m) + 127) / 255) as u8
}

/// 仅用于日志：预览缩放滤镜名称。
pub(crate) fn filter_name(filter: FilterType) -> &'static str {
    match filter {
        FilterType::Nearest => "nearest",
        FilterType::Triangle => "triangle",
        FilterType::CatmullRom => "catmull-rom",
        FilterType::Gaussian => "gaussian",
        FilterType::Lanczos3 => "lanczos3",
    }
}
