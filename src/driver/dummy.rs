//! # Dummy 驱动
//!
//! 不做真实编解码的桩驱动：`store` 按路径把句柄记在内存里，
//! `load` 取回记录的句柄，没有记录时返回 1x1 占位图；
//! `display` 不输出任何字节，只记住最后一次展示的句柄。
//!
//! 记录不会自动过期，调用方用完后通过 `take` / `clear` 释放。

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use image::DynamicImage;

use super::ImageDriver;
use crate::error::ImageError;
use crate::handle::ImageHandle;

const DUMMY_EXTENSION: &str = ".dummy";
const DUMMY_MIME_TYPE: &str = "image/dummy";

/// 测试用桩驱动。
#[derive(Debug, Default)]
pub struct DummyImageDriver {
    stored: Mutex<HashMap<PathBuf, ImageHandle>>,
    last_displayed: Mutex<Option<ImageHandle>>,
}

impl DummyImageDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1x1 占位句柄。
    pub fn placeholder() -> ImageHandle {
        ImageHandle::new(DynamicImage::new_rgba8(1, 1))
    }

    fn stored_guard(&self) -> Result<MutexGuard<'_, HashMap<PathBuf, ImageHandle>>, ImageError> {
        self.stored
            .lock()
            .map_err(|_| ImageError::ResourceLimit("句柄记录锁已中毒".to_string()))
    }

    fn displayed_guard(&self) -> Result<MutexGuard<'_, Option<ImageHandle>>, ImageError> {
        self.last_displayed
            .lock()
            .map_err(|_| ImageError::ResourceLimit("展示记录锁已中毒".to_string()))
    }

    /// 获取某路径下记录的句柄副本。
    pub fn stored(&self, path: impl AsRef<Path>) -> Result<Option<ImageHandle>, ImageError> {
        Ok(self.stored_guard()?.get(path.as_ref()).cloned())
    }

    /// 当前记录的句柄数量。
    pub fn stored_count(&self) -> Result<usize, ImageError> {
        Ok(self.stored_guard()?.len())
    }

    /// 移除并返回某路径下记录的句柄。
    pub fn take(&self, path: impl AsRef<Path>) -> Result<Option<ImageHandle>, ImageError> {
        Ok(self.stored_guard()?.remove(path.as_ref()))
    }

    /// 释放全部记录（含最后一次展示的句柄），返回释放的路径数。
    pub fn clear(&self) -> Result<usize, ImageError> {
        let released = {
            let mut stored = self.stored_guard()?;
            let count = stored.len();
            stored.clear();
            stored.shrink_to_fit();
            count
        };
        *self.displayed_guard()? = None;

        log::debug!("🧹 Dummy 已释放 {} 条句柄记录", released);
        Ok(released)
    }

    /// 获取最后一次展示的句柄副本。
    pub fn last_displayed(&self) -> Result<Option<ImageHandle>, ImageError> {
        Ok(self.displayed_guard()?.clone())
    }
}

impl ImageDriver for DummyImageDriver {
    fn load(&self, path: &Path) -> Result<ImageHandle, ImageError> {
        let stored = self.stored_guard()?;
        match stored.get(path) {
            Some(handle) => {
                log::debug!("♻️ Dummy 命中已存句柄 - 路径: {}", path.display());
                Ok(handle.clone())
            }
            None => Ok(Self::placeholder()),
        }
    }

    fn store(&self, path: &Path, handle: &ImageHandle) -> Result<(), ImageError> {
        self.validate_handle(handle)?;

        self.stored_guard()?
            .insert(path.to_path_buf(), handle.clone());

        log::debug!("💾 Dummy 已记录句柄 - 路径: {}", path.display());
        Ok(())
    }

    fn display_to(&self, handle: &ImageHandle, _out: &mut dyn Write) -> Result<(), ImageError> {
        self.validate_handle(handle)?;
        *self.displayed_guard()? = Some(handle.clone());
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        DUMMY_EXTENSION
    }

    fn mime_type(&self) -> &'static str {
        DUMMY_MIME_TYPE
    }
}
