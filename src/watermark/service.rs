//! # 服务层（控制器）
//!
//! ## 设计思路
//!
//! `WatermarkServiceState` 同时持有 `WatermarkHandler` 与会话状态，
//! 替代原先散落在窗口对象上的隐式字段：
//! 1. 生命周期清晰（由 `main.rs` 创建并持有）
//! 2. 测试可创建独立实例，互不影响
//! 3. UI 层只与这里的少量方法交互
//!
//! ## 实现思路
//!
//! 会话放在 `Mutex` 中，每个用户动作在一次加锁内完成，不存在部分更新。

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::source::DisplayBuffer;
use super::{
    PreviewProfile, WatermarkConfig, WatermarkError, WatermarkHandler, WatermarkSession,
    WatermarkSettings,
};

/// 预览信息摘要，供 UI 层展示。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PreviewInfo {
    pub source_path: String,
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pub watermarked: bool,
}

pub struct WatermarkServiceState {
    handler: WatermarkHandler,
    session: Mutex<WatermarkSession>,
}

impl WatermarkServiceState {
    /// 使用默认配置创建服务状态。
    pub fn new() -> Self {
        Self::with_config(WatermarkConfig::default())
    }

    pub fn with_config(config: WatermarkConfig) -> Self {
        Self {
            handler: WatermarkHandler::new(config),
            session: Mutex::new(WatermarkSession::new()),
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, WatermarkSession>, WatermarkError> {
        self.session
            .lock()
            .map_err(|_| WatermarkError::ResourceLimit("会话状态锁已中毒".to_string()))
    }

    pub fn open_image(&self, path: &Path) -> Result<PreviewInfo, WatermarkError> {
        let mut session = self.lock_session()?;
        self.handler.load_image(&mut session, path)?;
        Self::preview_of(&session)
    }

    pub fn add_watermark(&self) -> Result<PreviewInfo, WatermarkError> {
        let mut session = self.lock_session()?;
        self.handler.add_watermark(&mut session)?;
        Self::preview_of(&session)
    }

    pub fn save_image(&self, path: &Path) -> Result<(), WatermarkError> {
        let session = self.lock_session()?;
        self.handler.save_watermarked(&session, path)
    }

    /// 当前预览缓冲的副本；尚未加载图片时为 `None`。
    pub fn display_buffer(&self) -> Result<Option<DisplayBuffer>, WatermarkError> {
        Ok(self.lock_session()?.display().cloned())
    }

    pub fn set_preview_profile(&self, profile: &str) -> Result<(), WatermarkError> {
        let profile = PreviewProfile::from_str(profile)?;
        self.handler.set_preview_profile(profile)
    }

    pub fn get_preview_profile(&self) -> Result<String, WatermarkError> {
        Ok(self.handler.get_preview_profile()?.as_str().to_string())
    }

    pub fn set_settings(&self, settings: &WatermarkSettings) -> Result<(), WatermarkError> {
        self.handler.set_settings(settings)
    }

    pub fn get_settings(&self) -> Result<WatermarkSettings, WatermarkError> {
        self.handler.get_settings()
    }

    fn preview_of(session: &WatermarkSession) -> Result<PreviewInfo, WatermarkError> {
        let display = session
            .display()
            .ok_or_else(|| WatermarkError::Precondition("尚未生成预览".to_string()))?;

        Ok(PreviewInfo {
            source_path: session
                .loaded_path()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            width: display.width,
            height: display.height,
            has_alpha: display.has_alpha(),
            watermarked: session.working().is_some(),
        })
    }
}

impl Default for WatermarkServiceState {
    fn default() -> Self {
        Self::new()
    }
}
