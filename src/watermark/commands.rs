//! # 命令层
//!
//! ## 设计思路
//!
//! 命令层只做参数适配与结果返回，不承载业务逻辑，也不直接弹窗。
//! 路径参数为 `None` 或空白表示用户取消了对话框：返回 `Ok(None)`，不是错误。
//! 失败统一转换为带 `code` / `stage` 的 `WatermarkCommandError`，由 UI 层决定如何展示。

use std::path::PathBuf;

use super::service::{PreviewInfo, WatermarkServiceState};
use super::{WatermarkError, WatermarkSettings};
use crate::error::AppError;

#[derive(Debug, Clone, serde::Serialize)]
pub struct WatermarkCommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<WatermarkError> for WatermarkCommandError {
    fn from(error: WatermarkError) -> Self {
        if !error.is_expected() {
            log::error!("❌ 水印处理出现异常错误（stage={}）：{}", error.stage(), error);
        }
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

fn chosen_path(path: Option<String>) -> Option<PathBuf> {
    path.map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// 打开图片并生成预览。
pub fn browse_image(
    state: &WatermarkServiceState,
    path: Option<String>,
) -> Result<Option<PreviewInfo>, WatermarkCommandError> {
    let Some(path) = chosen_path(path) else {
        log::debug!("打开对话框已取消");
        return Ok(None);
    };

    let preview = state.open_image(&path).map_err(WatermarkCommandError::from)?;
    Ok(Some(preview))
}

/// 给当前图片添加水印。
pub fn add_watermark(state: &WatermarkServiceState) -> Result<PreviewInfo, WatermarkCommandError> {
    state.add_watermark().map_err(WatermarkCommandError::from)
}

/// 将水印图片保存到用户选择的路径。
pub fn save_watermarked_image(
    state: &WatermarkServiceState,
    path: Option<String>,
) -> Result<Option<PathBuf>, WatermarkCommandError> {
    let Some(path) = chosen_path(path) else {
        log::debug!("保存对话框已取消");
        return Ok(None);
    };

    state.save_image(&path).map_err(WatermarkCommandError::from)?;
    Ok(Some(path))
}

/// 切换预览缩放档位。
pub fn set_preview_profile(state: &WatermarkServiceState, profile: String) -> Result<(), AppError> {
    state.set_preview_profile(&profile)?;
    Ok(())
}

pub fn get_preview_profile(state: &WatermarkServiceState) -> Result<String, AppError> {
    Ok(state.get_preview_profile()?)
}

/// 以 JSON 形式读取水印设置。
pub fn get_watermark_settings(state: &WatermarkServiceState) -> Result<String, AppError> {
    let settings = state.get_settings()?;
    serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))
}

/// 以 JSON 形式更新水印设置，缺省字段保持当前值。
pub fn set_watermark_settings(state: &WatermarkServiceState, json: &str) -> Result<(), AppError> {
    let current = serde_json::to_value(state.get_settings()?)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;
    let patch: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| AppError::Settings(format!("解析设置失败: {}", e)))?;

    let serde_json::Value::Object(patch) = patch else {
        return Err(AppError::Settings("设置必须是 JSON 对象".to_string()));
    };

    let mut merged = current;
    if let serde_json::Value::Object(fields) = &mut merged {
        for (key, value) in patch {
            fields.insert(key, value);
        }
    }

    let settings: WatermarkSettings = serde_json::from_value(merged)
        .map_err(|e| AppError::Settings(format!("设置字段无效: {}", e)))?;
    state.set_settings(&settings)?;
    Ok(())
}

/// 只更新 logo 路径。
pub fn set_logo_path(state: &WatermarkServiceState, path: String) -> Result<(), AppError> {
    let settings = WatermarkSettings {
        logo_path: path,
        ..state.get_settings()?
    };
    state.set_settings(&settings)?;
    Ok(())
}
