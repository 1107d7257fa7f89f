//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `WatermarkHandler` 只负责流程编排与配置管理，不持有会话状态，
//! 会话由调用方以 `&mut WatermarkSession` 显式传入。
//! 处理链路：
//! 1. 读取配置快照
//! 2. 加载底图 / logo
//! 3. 合成
//! 4. 生成预览缓冲并一次性提交到会话
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<WatermarkConfig>>` 支持运行时修改。
//! - 单次操作内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录各阶段耗时，便于性能诊断。

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::compositor::{composite, filter_name};
use super::display::to_display_buffer;
use super::pipeline::fit_to_display;
use super::source::DisplayBuffer;
use super::{PreviewProfile, WatermarkConfig, WatermarkError, WatermarkSession, WatermarkSettings};

/// 水印处理器。
pub struct WatermarkHandler {
    pub(super) config: Arc<RwLock<WatermarkConfig>>,
}

impl WatermarkHandler {
    pub fn new(config: WatermarkConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照。
    pub(super) fn config_snapshot(&self) -> Result<WatermarkConfig, WatermarkError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| WatermarkError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    fn update_config<F>(&self, update: F) -> Result<(), WatermarkError>
    where
        F: FnOnce(&mut WatermarkConfig) -> Result<(), WatermarkError>,
    {
        let mut config = self
            .config
            .write()
            .map_err(|_| WatermarkError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        update(&mut config)
    }

    pub fn set_preview_profile(&self, profile: PreviewProfile) -> Result<(), WatermarkError> {
        self.update_config(|config| {
            config.apply_preview_profile(profile);
            log::info!(
                "⚙️ 已切换预览档位：{:?}（filter={}）",
                profile,
                filter_name(config.resize_filter)
            );
            Ok(())
        })
    }

    pub fn get_preview_profile(&self) -> Result<PreviewProfile, WatermarkError> {
        Ok(self.config_snapshot()?.infer_preview_profile())
    }

    pub fn set_settings(&self, settings: &WatermarkSettings) -> Result<(), WatermarkError> {
        self.update_config(|config| {
            config.apply_settings(settings)?;
            log::info!(
                "⚙️ 已更新水印设置：logo={} size={}x{} offset=({}, {}) display={}",
                config.logo_path.display(),
                config.logo_size.0,
                config.logo_size.1,
                config.offset_right,
                config.offset_bottom,
                config.display_max_dimension
            );
            Ok(())
        })
    }

    pub fn get_settings(&self) -> Result<WatermarkSettings, WatermarkError> {
        Ok(self.config_snapshot()?.settings())
    }

    /// 打开底图：加载 → 归一化 → 生成预览，成功后一次性替换会话状态。
    pub fn load_image(
        &self,
        session: &mut WatermarkSession,
        path: &Path,
    ) -> Result<(), WatermarkError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let loaded = self.load_from_file(path, &config)?;
        let load_elapsed = load_start.elapsed();

        let display_start = Instant::now();
        let display = Self::prepare_display(&loaded.image, &config)?;
        let display_elapsed = display_start.elapsed();

        session.replace_loaded(loaded, display);

        log::info!(
            "✅ 图片打开完成 - load={}ms display={}ms total={}ms",
            load_elapsed.as_millis(),
            display_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(())
    }

    /// 给当前底图添加水印。
    ///
    /// 未加载底图时返回 `Precondition`（先于 logo 检查）；
    /// logo 缺失时返回 `OverlayNotFound`，会话状态保持不变。
    pub fn add_watermark(&self, session: &mut WatermarkSession) -> Result<(), WatermarkError> {
        let config = self.config_snapshot()?;
        let base = session.require_base()?;
        let total_start = Instant::now();

        let overlay = self.load_overlay(&config)?;

        let composite_start = Instant::now();
        let working = composite(base, &overlay, &config)?;
        let composite_elapsed = composite_start.elapsed();

        let display_start = Instant::now();
        let display = Self::prepare_display(&working, &config)?;
        let display_elapsed = display_start.elapsed();

        session.replace_working(working, display);

        log::info!(
            "✅ 水印添加完成 - composite={}ms display={}ms total={}ms",
            composite_elapsed.as_millis(),
            display_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(())
    }

    /// 保存当前合成结果到 `path`。
    pub fn save_watermarked(
        &self,
        session: &WatermarkSession,
        path: &Path,
    ) -> Result<(), WatermarkError> {
        let working = session.require_working()?;
        self.write_image(working, path)
    }

    fn prepare_display(
        image: &image::DynamicImage,
        config: &WatermarkConfig,
    ) -> Result<DisplayBuffer, WatermarkError> {
        let fitted = fit_to_display(image, config.display_max_dimension, config.resize_filter)?;
        let display = to_display_buffer(&fitted)?;
        log::debug!(
            "🖥️ 预览缓冲已生成 - {}x{} alpha={}",
            display.width,
            display.height,
            display.has_alpha()
        );
        Ok(display)
    }
}
