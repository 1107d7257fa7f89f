//! # 图片水印工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            UI 层（main.rs 交互式外壳 / 任意前端）         │
//! │   打开图片 ── 添加水印 ── 另存为 ── 设置                  │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<Option<T>, WatermarkCommandError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  └─ watermark                                            │
//! │      ├─ commands / service   命令适配 + 会话控制器       │
//! │      ├─ handler              流程编排                    │
//! │      ├─ loader / writer      读取与保存                  │
//! │      ├─ compositor           logo 蒙版合成               │
//! │      └─ pipeline / display   缩放 + 预览平面化           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 应用级错误 `AppError` |
//! | [`watermark`] | 加载图片、合成 logo、生成预览缓冲、保存结果 |

pub mod error;
pub mod watermark;
