//! # 会话状态
//!
//! 显式保存“当前加载的底图路径 / 底图 / 合成结果 / 预览缓冲”，
//! 由控制器持有并按引用传给各操作。新的加载会一次性替换全部字段；
//! 失败的操作不会留下半更新的状态。

use std::path::{Path, PathBuf};

use image::DynamicImage;

use super::WatermarkError;
use super::source::{DisplayBuffer, LoadedImage};

#[derive(Default)]
pub struct WatermarkSession {
    loaded_path: Option<PathBuf>,
    base: Option<DynamicImage>,
    working: Option<DynamicImage>,
    display: Option<DisplayBuffer>,
}

impl WatermarkSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded_path.as_deref()
    }

    pub fn base(&self) -> Option<&DynamicImage> {
        self.base.as_ref()
    }

    /// 最近一次合成结果。
    pub fn working(&self) -> Option<&DynamicImage> {
        self.working.as_ref()
    }

    pub fn display(&self) -> Option<&DisplayBuffer> {
        self.display.as_ref()
    }

    /// 取出底图；未加载时返回 `Precondition`。
    pub(crate) fn require_base(&self) -> Result<&DynamicImage, WatermarkError> {
        self.base.as_ref().ok_or_else(|| {
            WatermarkError::Precondition("请先打开一张图片，再使用水印功能".to_string())
        })
    }

    /// 取出合成结果；未加载或尚未添加水印时返回 `Precondition`。
    pub(crate) fn require_working(&self) -> Result<&DynamicImage, WatermarkError> {
        if self.base.is_none() {
            return Err(WatermarkError::Precondition(
                "请先打开一张图片，再保存图片".to_string(),
            ));
        }
        self.working.as_ref().ok_or_else(|| {
            WatermarkError::Precondition("请先添加水印，再保存图片".to_string())
        })
    }

    pub(crate) fn replace_loaded(&mut self, loaded: LoadedImage, display: DisplayBuffer) {
        self.loaded_path = Some(loaded.path);
        self.base = Some(loaded.image);
        self.working = None;
        self.display = Some(display);
    }

    pub(crate) fn replace_working(&mut self, working: DynamicImage, display: DisplayBuffer) {
        self.working = Some(working);
        self.display = Some(display);
    }
}
