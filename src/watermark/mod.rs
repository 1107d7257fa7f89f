//! # 水印模块（watermark）
//!
//! ## 设计思路
//!
//! 该模块将“打开图片 → 归一化 → 合成 logo → 生成预览 → 保存”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `commands`：UI 入参/出参适配（薄封装），取消不算错误
//! - `service`：控制器，持有处理器与会话状态
//! - `session`：显式会话状态（路径 / 底图 / 合成结果 / 预览缓冲）
//! - `handler`：编排整条处理流水线
//! - `loader`：文件加载、签名与像素上限校验
//! - `pipeline`：颜色模式归一化、精确缩放、预览适配
//! - `compositor`：按固定偏移以 alpha 蒙版贴 logo
//! - `display`：RGBA 交错 → RGB + alpha 平面
//! - `writer`：按扩展名保存
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! UI 层（main.rs 交互式外壳）
//!    ↓
//! commands.rs（参数适配，None = 取消）
//!    ↓
//! service.rs（锁定会话，服务入口）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（加载 + 校验 + 归一化）
//!    ├─ compositor.rs（logo 缩放 + 蒙版贴图）
//!    ├─ pipeline.rs + display.rs（预览适配 + 平面化）
//!    └─ writer.rs（保存）
//!    ↓
//! 返回 WatermarkCommandError 给 UI 层
//! ```

pub mod commands;
mod compositor;
mod config;
mod display;
mod error;
mod handler;
mod loader;
mod pipeline;
mod service;
mod session;
mod source;
mod writer;

pub use compositor::{composite, overlay_position};
pub use config::{
    DEFAULT_DISPLAY_MAX_DIMENSION, DEFAULT_LOGO_PATH, DEFAULT_LOGO_SIZE, DEFAULT_OFFSET_BOTTOM,
    DEFAULT_OFFSET_RIGHT, PreviewProfile, WatermarkConfig, WatermarkSettings,
};
pub use display::to_display_buffer;
pub use error::WatermarkError;
pub use handler::WatermarkHandler;
pub use pipeline::{fit_to_display, fitted_dimensions, normalize, resize_exact};
pub use service::{PreviewInfo, WatermarkServiceState};
pub use session::WatermarkSession;
pub use source::{DisplayBuffer, OverlayPlacement, SourceFormat};
pub use writer::suggested_file_name;
