//! # 变换流水线模块
//!
//! ## 设计思路
//!
//! 集中管理与像素格式、尺寸相关的变换：
//! - `normalize`：按来源格式把图片统一为 RGB8 或 RGBA8
//! - `resize_exact`：精确缩放到目标尺寸（不保持宽高比），用于 logo
//! - `fit_to_display`：按较长边等比缩放到预览尺寸
//!
//! ## 实现思路
//!
//! 缩放优先走 `fast_image_resize`（SIMD 卷积），失败时回退 `image::resize_exact`。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Rgb, Rgba};

use super::WatermarkError;
use super::source::SourceFormat;

/// 按来源格式归一化颜色模式：PNG → RGBA8，其余 → RGB8。
pub fn normalize(image: DynamicImage, source_format: SourceFormat) -> DynamicImage {
    match source_format {
        SourceFormat::Png => match image {
            DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        },
        SourceFormat::Other => match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
    }
}

/// 计算预览尺寸：较长边等于 `max_dimension`，另一边按比例截断取整（至少 1）。
///
/// 横图按宽度、竖图按高度适配；正方形两边都等于 `max_dimension`。
pub fn fitted_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let max = max_dimension as u64;
    if width >= height {
        let new_height = (max * height as u64 / width as u64).max(1) as u32;
        (max_dimension, new_height)
    } else {
        let new_width = (max * width as u64 / height as u64).max(1) as u32;
        (new_width, max_dimension)
    }
}

/// 将图片等比缩放到预览区域。
pub fn fit_to_display(
    image: &DynamicImage,
    max_dimension: u32,
    filter: FilterType,
) -> Result<DynamicImage, WatermarkError> {
    let (width, height) = fitted_dimensions(image.width(), image.height(), max_dimension);
    resize_exact(image, width, height, filter)
}

/// 精确缩放到 `target_width x target_height`，保持原颜色模式（RGB / RGBA）。
pub fn resize_exact(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<DynamicImage, WatermarkError> {
    if target_width == 0 || target_height == 0 {
        return Err(WatermarkError::ResourceLimit(format!(
            "缩放目标尺寸无效：{}x{}",
            target_width, target_height
        )));
    }

    if image.width() == target_width && image.height() == target_height {
        return Ok(image.clone());
    }

    match resize_with_fast_image_resize(image, target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            Ok(image.resize_exact(target_width, target_height, filter))
        }
    }
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<DynamicImage, WatermarkError> {
    let has_alpha = image.color().has_alpha();
    let (pixel_type, raw) = if has_alpha {
        (fr::PixelType::U8x4, image.to_rgba8().into_raw())
    } else {
        (fr::PixelType::U8x3, image.to_rgb8().into_raw())
    };

    let src_image = fr::images::Image::from_vec_u8(image.width(), image.height(), raw, pixel_type)
        .map_err(|e| WatermarkError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, pixel_type);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| WatermarkError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    let buffer = dst_image.into_vec();
    let resized = if has_alpha {
        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, buffer)
            .map(DynamicImage::ImageRgba8)
    } else {
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(target_width, target_height, buffer)
            .map(DynamicImage::ImageRgb8)
    };

    resized.ok_or_else(|| WatermarkError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use proptest::prelude::*;

    fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 255) as u8, (y % 255) as u8, 40])
        }))
    }

    #[test]
    fn normalize_png_gives_rgba() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(3, 2));
        let normalized = normalize(gray, SourceFormat::Png);
        assert_eq!(normalized.color(), image::ColorType::Rgba8);
        assert_eq!(normalized.as_bytes().len(), 3 * 2 * 4);
    }

    #[test]
    fn normalize_other_drops_alpha() {
        let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 2, Rgba([9, 8, 7, 0])));
        let normalized = normalize(rgba, SourceFormat::Other);
        assert_eq!(normalized.color(), image::ColorType::Rgb8);
        assert_eq!(normalized.as_bytes(), &[9, 8, 7, 9, 8, 7, 9, 8, 7, 9, 8, 7]);
    }

    #[test]
    fn landscape_fits_on_width() {
        assert_eq!(fitted_dimensions(1600, 1000, 600), (600, 375));
    }

    #[test]
    fn portrait_fits_on_height() {
        assert_eq!(fitted_dimensions(1000, 1600, 600), (375, 600));
    }

    #[test]
    fn square_and_small_images_are_upscaled() {
        assert_eq!(fitted_dimensions(50, 50, 600), (600, 600));
        assert_eq!(fitted_dimensions(300, 100, 600), (600, 200));
    }

    #[test]
    fn extreme_aspect_ratio_keeps_one_pixel() {
        assert_eq!(fitted_dimensions(10_000, 1, 600), (600, 1));
    }

    #[test]
    fn fit_to_display_preserves_color_mode() {
        let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(40, 20, Rgba([1, 2, 3, 4])));
        let fitted = fit_to_display(&rgba, 100, FilterType::Triangle).expect("fit should succeed");
        assert_eq!((fitted.width(), fitted.height()), (100, 50));
        assert_eq!(fitted.color(), image::ColorType::Rgba8);

        let rgb = gradient_rgb(20, 40);
        let fitted = fit_to_display(&rgb, 100, FilterType::Nearest).expect("fit should succeed");
        assert_eq!((fitted.width(), fitted.height()), (50, 100));
        assert_eq!(fitted.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn resize_exact_ignores_aspect_ratio() {
        let logo =
            DynamicImage::ImageRgba8(ImageBuffer::from_pixel(64, 16, Rgba([200, 0, 0, 255])));
        let resized =
            resize_exact(&logo, 20, 20, FilterType::Triangle).expect("resize should succeed");
        assert_eq!((resized.width(), resized.height()), (20, 20));
        let px = resized.to_rgba8().get_pixel(10, 10).0;
        assert!(px[0].abs_diff(200) <= 1 && px[1] <= 1 && px[2] <= 1 && px[3] >= 254);
    }

    #[test]
    fn resize_exact_rejects_zero_target() {
        let img = gradient_rgb(4, 4);
        assert!(matches!(
            resize_exact(&img, 0, 4, FilterType::Triangle),
            Err(WatermarkError::ResourceLimit(_))
        ));
    }

    proptest! {
        #[test]
        fn fitted_larger_side_equals_max(
            width in 1u32..5000,
            height in 1u32..5000,
            max in 16u32..2000,
        ) {
            let (w, h) = fitted_dimensions(width, height, max);
            prop_assert_eq!(w.max(h), max);

            // 宽高比误差在 ±1 像素以内
            if width >= height {
                let ideal = max as f64 * height as f64 / width as f64;
                prop_assert!((h as f64 - ideal).abs() <= 1.0);
            } else {
                let ideal = max as f64 * width as f64 / height as f64;
                prop_assert!((w as f64 - ideal).abs() <= 1.0);
            }
        }
    }
}
