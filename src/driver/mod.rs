//! # 图片驱动模块（driver）
//!
//! ## 设计思路
//!
//! 每种图片类型对应一个驱动，负责"读取 → 解码 → 编码 → 输出 → 描述"。
//! 容器层（`Image`）与类型层（`ImageType`）只做转发，真正的编解码都落在驱动里。
//!
//! - `png`：基于 `image` crate 的 PNG 编解码，带签名校验与资源上限
//! - `dummy`：不做真实编解码的桩驱动，按路径在内存中记住句柄，供测试使用
//!
//! ## 调用链
//!
//! ```text
//! Image::load / store / display
//!    ↓
//! ImageType（按变体选择驱动）
//!    ↓
//! DriverRegistry::driver
//!    ├─ PngImageDriver（签名校验 + 尺寸预检 + 解码 / 编码）
//!    └─ DummyImageDriver（内存记录，无 I/O）
//! ```

mod dummy;
mod png;

use std::io::Write;
use std::path::Path;

pub use dummy::DummyImageDriver;
pub use png::PngImageDriver;

use crate::error::ImageError;
use crate::handle::ImageHandle;

/// 单一图片格式的驱动能力集合。
///
/// 注册表在多处以共享引用持有驱动，因此要求 `Send + Sync`。
pub trait ImageDriver: Send + Sync {
    /// 从文件加载并产出句柄。
    fn load(&self, path: &Path) -> Result<ImageHandle, ImageError>;

    /// 将句柄写入目标文件。
    fn store(&self, path: &Path, handle: &ImageHandle) -> Result<(), ImageError>;

    /// 将句柄编码后写入给定输出流。
    fn display_to(&self, handle: &ImageHandle, out: &mut dyn Write) -> Result<(), ImageError>;

    /// 判断句柄是否是本驱动可接受的资源。
    ///
    /// 默认只要求宽高非零。
    fn validate_handle(&self, handle: &ImageHandle) -> Result<(), ImageError> {
        if !handle.is_usable() {
            let (width, height) = handle.dimensions();
            return Err(ImageError::InvalidArgument(format!(
                "句柄不是有效的图片资源：尺寸 {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    /// 默认扩展名（如 `.png`）。
    fn file_extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}
