//! # PNG 驱动
//!
//! ## 设计思路
//!
//! 在"尽可能早"的阶段执行输入校验，尽快失败，减少不必要的内存与 CPU 消耗。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 加载：
//! 1. 存在性 + metadata 体积限制 + 读取
//! 2. 通过文件签名（magic bytes）确认是 PNG
//! 3. 读取 header 尺寸，按像素 / 内存上限快速拒绝
//! 4. 完整解码
//!
//! 存储 / 输出：按配置的压缩档位编码，写入文件或输出流。

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::codecs::png::{FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::ImageDriver;
use crate::config::DriverConfig;
use crate::error::ImageError;
use crate::handle::ImageHandle;

const PNG_EXTENSION: &str = ".png";
const PNG_MIME_TYPE: &str = "image/png";

/// 基于 `image` crate 的 PNG 驱动。
#[derive(Debug, Clone, Default)]
pub struct PngImageDriver {
    config: DriverConfig,
}

impl PngImageDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// 读取文件字节，读取前先按 metadata 检查体积。
    fn read_with_limit(&self, path: &Path) -> Result<Vec<u8>, ImageError> {
        if !path.exists() {
            return Err(ImageError::FileSystem(format!("文件不存在：{}", path.display())));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > self.config.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        std::fs::read(path).map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))
    }

    /// 通过文件签名校验输入是否为 PNG。
    fn validate_png_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| ImageError::InvalidFormat("无法识别图片类型".to_string()))?;

        match kind.mime_type() {
            "image/png" | "image/apng" => Ok(()),
            other => Err(ImageError::InvalidFormat(format!(
                "文件签名不是 PNG：{}",
                other
            ))),
        }
    }

    /// 仅通过 PNG 头信息读取宽高。
    fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png)
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > self.config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, self.config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > self.config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                self.config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    fn encode<W: Write>(&self, handle: &ImageHandle, writer: W) -> Result<(), ImageError> {
        let encoder = PngEncoder::new_with_quality(
            writer,
            self.config.compression.compression_type(),
            FilterType::Adaptive,
        );

        handle
            .as_dynamic()
            .write_with_encoder(encoder)
            .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))
    }
}

impl ImageDriver for PngImageDriver {
    fn load(&self, path: &Path) -> Result<ImageHandle, ImageError> {
        log::info!("📁 开始读取 PNG 图片 - 路径: {}", path.display());

        let bytes = self.read_with_limit(path)?;
        Self::validate_png_signature(&bytes)?;

        let (width, height) = Self::inspect_dimensions(&bytes)?;
        self.validate_pixel_limits(width, height)?;
        self.validate_decoded_memory_limits(width, height)?;

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        log::info!(
            "✅ PNG 解码成功 - 路径: {} 尺寸: {}x{}",
            path.display(),
            width,
            height
        );

        Ok(ImageHandle::new(decoded))
    }

    fn store(&self, path: &Path, handle: &ImageHandle) -> Result<(), ImageError> {
        self.validate_handle(handle)?;

        let file = File::create(path).map_err(|e| {
            ImageError::FileSystem(format!("无法创建文件 '{}'：{}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        self.encode(handle, &mut writer)?;
        writer
            .flush()
            .map_err(|e| ImageError::FileSystem(format!("写入图片文件失败：{}", e)))?;

        log::info!(
            "💾 PNG 已保存 - 路径: {} 尺寸: {}x{} 压缩: {}",
            path.display(),
            handle.width(),
            handle.height(),
            self.config.compression.as_str()
        );

        Ok(())
    }

    fn display_to(&self, handle: &ImageHandle, out: &mut dyn Write) -> Result<(), ImageError> {
        self.validate_handle(handle)?;
        self.encode(handle, &mut *out)?;
        out.flush()?;
        log::debug!("🖼️ PNG 已输出 - 尺寸: {}x{}", handle.width(), handle.height());
        Ok(())
    }

    /// PNG 不支持浮点像素，除宽高外还要检查像素类型。
    fn validate_handle(&self, handle: &ImageHandle) -> Result<(), ImageError> {
        let (width, height) = handle.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument(format!(
                "句柄不是有效的 PNG 资源：尺寸 {}x{}",
                width, height
            )));
        }

        if matches!(
            handle.as_dynamic(),
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)
        ) {
            log::warn!("⚠️ 拒绝浮点像素句柄：{:?}", handle.as_dynamic().color());
            return Err(ImageError::InvalidArgument(format!(
                "句柄不是有效的 PNG 资源：不支持的像素类型 {:?}",
                handle.as_dynamic().color()
            )));
        }

        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        PNG_EXTENSION
    }

    fn mime_type(&self) -> &'static str {
        PNG_MIME_TYPE
    }
}
