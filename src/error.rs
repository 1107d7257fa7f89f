//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError`，承载水印链路之外的失败（设置解析、终端 I/O），
//! 并通过 `#[from]` 直接吸收 `WatermarkError`，无需手动 map。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 实现 `Serialize` 将错误序列化为字符串，便于 UI 层统一展示。

use serde::Serialize;

use crate::watermark::WatermarkError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 水印处理流水线错误（加载 / 合成 / 保存）
    #[error("{0}")]
    Watermark(#[from] WatermarkError),

    /// 终端或文件系统 I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置读写失败
    #[error("设置错误: {0}")]
    Settings(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_message() {
        let err = AppError::Settings("坏掉了".to_string());
        let json = serde_json::to_string(&err).expect("serialize error");
        assert_eq!(json, "\"设置错误: 坏掉了\"");
    }

    #[test]
    fn watermark_error_message_is_passed_through() {
        let err: AppError = WatermarkError::Decode("x".to_string()).into();
        assert_eq!(err.to_string(), "解码错误：x");
    }
}
