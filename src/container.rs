//! # 图片容器
//!
//! ## 设计思路
//!
//! `Image` 把文件名、图片类型与句柄绑在一起，对外提供统一门面，
//! 所有操作都转发给类型绑定的驱动，容器本身只在构造时校验句柄。
//!
//! 句柄由 `Image` 独占，容器离开作用域即释放，不需要显式关闭。

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ImageError;
use crate::handle::ImageHandle;
use crate::image_type::ImageType;
use crate::resource::ResourceLoader;

/// 图片容器。
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    file_name: PathBuf,
    image_type: ImageType,
    handle: Option<ImageHandle>,
}

impl Image {
    /// 构造容器。
    ///
    /// 传入句柄时必须通过类型驱动的校验，否则返回 `InvalidArgument`；
    /// 不传句柄总是成功。
    ///
    /// # 示例
    /// ```rust
    /// use image_container::{Image, ImageType};
    ///
    /// let image = Image::new("later.png", ImageType::Png, None)?;
    /// assert!(image.handle().is_none());
    /// # Ok::<(), image_container::ImageError>(())
    /// ```
    pub fn new(
        file_name: impl Into<PathBuf>,
        image_type: ImageType,
        handle: Option<ImageHandle>,
    ) -> Result<Self, ImageError> {
        if let Some(handle) = &handle {
            image_type.validate_handle(handle)?;
        }

        Ok(Self {
            file_name: file_name.into(),
            image_type,
            handle,
        })
    }

    /// 从文件加载图片，驱动错误原样透传。
    pub fn load(file_name: impl Into<PathBuf>, image_type: ImageType) -> Result<Self, ImageError> {
        let file_name = file_name.into();
        let handle = image_type.load(&file_name)?;

        Ok(Self {
            file_name,
            image_type,
            handle: Some(handle),
        })
    }

    /// 先由解析器把资源 URI 解析为本地路径，再按路径加载。
    ///
    /// # 示例
    /// ```rust
    /// use std::path::PathBuf;
    /// use image_container::{Image, ImageError, ImageType};
    ///
    /// let loader = |_: &str| -> Result<PathBuf, ImageError> {
    ///     Err(ImageError::ResourceNotFound("nope".into()))
    /// };
    /// let result = Image::load_from_resource("res://missing.png", &loader, ImageType::Png);
    /// assert!(matches!(result, Err(ImageError::ResourceNotFound(_))));
    /// ```
    pub fn load_from_resource<L>(
        uri: &str,
        loader: &L,
        image_type: ImageType,
    ) -> Result<Self, ImageError>
    where
        L: ResourceLoader + ?Sized,
    {
        let path = loader.resolve(uri)?;
        log::debug!("🔗 资源 {} -> {}", uri, path.display());
        Self::load(path, image_type)
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn handle(&self) -> Option<&ImageHandle> {
        self.handle.as_ref()
    }

    pub fn into_handle(self) -> Option<ImageHandle> {
        self.handle
    }

    /// 以给定文件名保存图片，返回自身以便链式调用。
    pub fn store(&self, file_name: impl AsRef<Path>) -> Result<&Self, ImageError> {
        let handle = self.require_handle("保存")?;
        self.image_type.store(file_name, handle)?;
        Ok(self)
    }

    /// 将编码后的图片写到标准输出。
    pub fn display(&self) -> Result<(), ImageError> {
        let handle = self.require_handle("输出")?;
        self.image_type.display(handle)
    }

    pub fn display_to(&self, out: &mut dyn Write) -> Result<(), ImageError> {
        let handle = self.require_handle("输出")?;
        self.image_type.display_to(handle, out)
    }

    pub fn file_extension(&self) -> &'static str {
        self.image_type.file_extension()
    }

    pub fn mime_type(&self) -> &'static str {
        self.image_type.mime_type()
    }

    fn require_handle(&self, action: &str) -> Result<&ImageHandle, ImageError> {
        self.handle.as_ref().ok_or_else(|| {
            ImageError::InvalidArgument(format!(
                "图片 '{}' 尚未加载句柄，无法{}",
                self.file_name.display(),
                action
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DummyImageDriver;
    use crate::image_type::DriverRegistry;
    use image::DynamicImage;

    #[test]
    fn new_without_handle_always_succeeds() {
        for image_type in ImageType::values() {
            let image = Image::new("x", *image_type, None).expect("construct failed");
            assert_eq!(image.image_type(), *image_type);
            assert!(image.handle().is_none());
        }
    }

    #[test]
    fn new_rejects_unusable_handle() {
        let handle = ImageHandle::new(DynamicImage::new_rgba8(0, 5));
        let result = Image::new("x.png", ImageType::Png, Some(handle));

        assert!(matches!(result, Err(ImageError::InvalidArgument(_))));
    }

    #[test]
    fn store_without_handle_is_invalid_argument() {
        let image = Image::new("x.dummy", ImageType::Dummy, None).expect("construct failed");

        assert!(matches!(
            image.store("y.dummy"),
            Err(ImageError::InvalidArgument(_))
        ));
        assert!(matches!(image.display_to(&mut Vec::new()), Err(ImageError::InvalidArgument(_))));
    }

    #[test]
    fn dummy_store_chains_and_round_trips() {
        let handle = ImageHandle::from_rgba(1, 2, vec![1; 8]).expect("build handle failed");
        let image = Image::new("image-rs-unit/source.dummy", ImageType::Dummy, Some(handle.clone()))
            .expect("construct failed");

        image
            .store("image-rs-unit/a.dummy")
            .and_then(|image| image.store("image-rs-unit/b.dummy"))
            .expect("store chain failed");

        let reloaded = Image::load("image-rs-unit/b.dummy", ImageType::Dummy).expect("load failed");
        assert_eq!(reloaded.handle(), Some(&handle));
        assert_eq!(
            DriverRegistry::global()
                .dummy()
                .stored("image-rs-unit/a.dummy")
                .expect("read record failed"),
            Some(handle)
        );

        for path in ["image-rs-unit/a.dummy", "image-rs-unit/b.dummy"] {
            assert!(DriverRegistry::global().dummy().take(path).expect("take failed").is_some());
        }
    }

    #[test]
    fn dummy_display_is_recorded() {
        let handle = DummyImageDriver::placeholder();
        let image = Image::new("shown.dummy", ImageType::Dummy, Some(handle)).expect("construct failed");
        let mut out = Vec::new();

        image.display_to(&mut out).expect("display failed");

        assert!(out.is_empty());
        assert!(
            DriverRegistry::global()
                .dummy()
                .last_displayed()
                .expect("read record failed")
                .is_some()
        );
    }

    #[test]
    fn into_handle_returns_ownership() {
        let handle = DummyImageDriver::placeholder();
        let image = Image::new("x.dummy", ImageType::Dummy, Some(handle.clone())).expect("construct failed");

        assert_eq!(image.into_handle(), Some(handle));
    }
}
