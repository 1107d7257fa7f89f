//! # 预览缓冲模块
//!
//! 预览控件需要平面化数据：一段 RGB 交错字节 + 一段独立的 alpha 平面，
//! 而不是编解码使用的 RGBA 交错布局。alpha 平面取自 RGBA 字节流中
//! 下标 3 开始、步长 4 的字节。

use image::DynamicImage;

use super::WatermarkError;
use super::source::DisplayBuffer;

/// 将任意图片转换为预览控件使用的平面化缓冲。
pub fn to_display_buffer(image: &DynamicImage) -> Result<DisplayBuffer, WatermarkError> {
    let (width, height) = (image.width(), image.height());
    let pixels = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| WatermarkError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

    let (color, alpha) = if image.color().has_alpha() {
        let rgba = image.to_rgba8().into_raw();
        let alpha: Vec<u8> = rgba.iter().skip(3).step_by(4).copied().collect();
        let color: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        (color, Some(alpha))
    } else {
        (image.to_rgb8().into_raw(), None)
    };

    if color.len() != pixels * 3 {
        return Err(WatermarkError::Decode("预览颜色平面长度异常".to_string()));
    }
    if alpha.as_ref().is_some_and(|a| a.len() != pixels) {
        return Err(WatermarkError::Decode("预览透明度平面长度异常".to_string()));
    }

    Ok(DisplayBuffer {
        width,
        height,
        color,
        alpha,
    })
}
