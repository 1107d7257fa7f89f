//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载水印链路中的所有错误来源。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! `code()` / `stage()` 给命令层输出稳定的结构化字段。

/// 水印处理统一错误类型。
///
/// 该类型会在命令层被转换为 `WatermarkCommandError`，由 UI 层决定如何弹窗。
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    /// 操作依赖的图片尚未加载（或尚未添加水印）。
    #[error("前置条件不满足：{0}")]
    Precondition(String),

    /// 水印 logo 文件无法定位或打开。
    #[error("水印图片不存在：{0}")]
    OverlayNotFound(String),

    /// 保存目标的扩展名不受支持，或与图片内容不匹配。
    #[error("文件扩展名错误：{0}")]
    InvalidExtension(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl WatermarkError {
    /// 稳定的错误码，供 UI 层做分支处理。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "precondition",
            Self::OverlayNotFound(_) => "overlay_not_found",
            Self::InvalidExtension(_) => "invalid_extension",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
        }
    }

    /// 错误发生的阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "composite",
            Self::OverlayNotFound(_) => "overlay",
            Self::InvalidExtension(_) | Self::Encode(_) => "save",
            Self::Decode(_) | Self::FileSystem(_) => "load",
            Self::ResourceLimit(_) => "config",
        }
    }

    /// 是否属于用户可预期的错误（无需按异常记录日志）。
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Precondition(_)
                | Self::OverlayNotFound(_)
                | Self::InvalidExtension(_)
                | Self::Decode(_)
        )
    }
}
