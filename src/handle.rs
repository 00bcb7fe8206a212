//! # 图片句柄
//!
//! ## 设计思路
//!
//! `ImageHandle` 独占一份已解码的位图（`image::DynamicImage`），
//! 由驱动的 `load` 产出，随所属 `Image` 一起释放（`Drop` 即释放）。
//!
//! 句柄本身只保证"像素缓冲与宽高一致"，
//! 是否为某种类型可接受的资源由驱动的 `validate_handle` 判定。

use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::error::ImageError;

/// 已解码图片的独占句柄。
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    raster: DynamicImage,
}

impl ImageHandle {
    pub fn new(raster: DynamicImage) -> Self {
        Self { raster }
    }

    /// 从 RGBA 原始字节构建句柄。
    ///
    /// `bytes` 长度必须等于 `width * height * 4`。
    ///
    /// # 示例
    /// ```rust
    /// use image_container::ImageHandle;
    ///
    /// let handle = ImageHandle::from_rgba(2, 1, vec![0; 8])?;
    /// assert_eq!(handle.dimensions(), (2, 1));
    /// # Ok::<(), image_container::ImageError>(())
    /// ```
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::InvalidArgument("图片尺寸导致内存溢出风险".to_string()))?;

        if bytes.len() != expected_len {
            return Err(ImageError::InvalidArgument(format!(
                "像素数据长度异常：{} 字节（期望 {}x{}x4 = {} 字节）",
                bytes.len(),
                width,
                height,
                expected_len
            )));
        }

        let buffer = RgbaImage::from_raw(width, height, bytes)
            .ok_or_else(|| ImageError::InvalidArgument("创建图像缓冲区失败".to_string()))?;

        Ok(Self::new(DynamicImage::ImageRgba8(buffer)))
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// 宽高均非零时句柄才可用。
    pub fn is_usable(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.raster
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.raster
    }
}

impl From<DynamicImage> for ImageHandle {
    fn from(raster: DynamicImage) -> Self {
        Self::new(raster)
    }
}
