//! # 图片类型与驱动注册表
//!
//! ## 设计思路
//!
//! `ImageType` 是封闭枚举（PNG / Dummy），每个变体绑定一个驱动；
//! 所有操作都按变体转发给 `DriverRegistry` 中对应的驱动。
//!
//! ## 实现思路
//!
//! - 注册表在进程内只构建一次，之后只读，不需要加锁。
//! - 启动时可用 `DriverRegistry::install` 注入自定义配置；
//!   未显式安装时，首次访问 `global()` 会按默认配置构建。
//! - 新增类型只能在源码层面增加变体，不支持运行时注册。

use std::fmt;
use std::io::Write;
use std::path::Path;

use once_cell::sync::OnceCell;

use crate::config::DriverConfig;
use crate::driver::{DummyImageDriver, ImageDriver, PngImageDriver};
use crate::error::ImageError;
use crate::handle::ImageHandle;

static REGISTRY: OnceCell<DriverRegistry> = OnceCell::new();

/// 进程级驱动表，每个变体一个驱动。
#[derive(Debug)]
pub struct DriverRegistry {
    png: PngImageDriver,
    dummy: DummyImageDriver,
}

impl DriverRegistry {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            png: PngImageDriver::new(config),
            dummy: DummyImageDriver::new(),
        }
    }

    /// 以给定配置安装进程级注册表。
    ///
    /// 只能成功一次；已安装（包括已被 `global()` 按默认配置初始化）时返回错误。
    pub fn install(config: DriverConfig) -> Result<&'static Self, ImageError> {
        config.validate()?;

        let mut installed = false;
        let registry = REGISTRY.get_or_init(|| {
            installed = true;
            Self::new(config)
        });

        if !installed {
            return Err(ImageError::Config("驱动注册表已初始化，不能重复安装".to_string()));
        }

        log::info!(
            "⚙️ 已安装驱动注册表（max_file_size={}, max_decoded_pixels={}, compression={}）",
            registry.png.config().max_file_size,
            registry.png.config().max_decoded_pixels,
            registry.png.config().compression.as_str()
        );

        Ok(registry)
    }

    /// 获取进程级注册表，未安装时按默认配置初始化。
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(|| Self::new(DriverConfig::default()))
    }

    pub fn driver(&self, image_type: ImageType) -> &dyn ImageDriver {
        match image_type {
            ImageType::Png => &self.png,
            ImageType::Dummy => &self.dummy,
        }
    }

    pub fn png(&self) -> &PngImageDriver {
        &self.png
    }

    pub fn dummy(&self) -> &DummyImageDriver {
        &self.dummy
    }
}

/// 图片类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    #[default]
    Png,
    Dummy,
}

impl ImageType {
    /// 全部变体。
    pub fn values() -> &'static [ImageType] {
        &[ImageType::Png, ImageType::Dummy]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Dummy => "Dummy",
        }
    }

    /// 按名称查找变体（忽略大小写与首尾空白）。
    ///
    /// # 示例
    /// ```rust
    /// use image_container::ImageType;
    ///
    /// assert_eq!(ImageType::from_name("png")?, ImageType::Png);
    /// assert!(ImageType::from_name("jpeg").is_err());
    /// # Ok::<(), image_container::ImageError>(())
    /// ```
    pub fn from_name(name: &str) -> Result<Self, ImageError> {
        let wanted = name.trim();
        Self::values()
            .iter()
            .copied()
            .find(|candidate| candidate.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ImageError::InvalidArgument(format!("未知图片类型：{}（可选：PNG / Dummy）", wanted))
            })
    }

    /// 当前变体绑定的驱动。
    pub fn driver(self) -> &'static dyn ImageDriver {
        DriverRegistry::global().driver(self)
    }

    pub fn load(self, path: impl AsRef<Path>) -> Result<ImageHandle, ImageError> {
        self.driver().load(path.as_ref())
    }

    pub fn store(self, path: impl AsRef<Path>, handle: &ImageHandle) -> Result<(), ImageError> {
        self.driver().store(path.as_ref(), handle)
    }

    /// 将编码后的图片写到标准输出。
    pub fn display(self, handle: &ImageHandle) -> Result<(), ImageError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.display_to(handle, &mut out)
    }

    pub fn display_to(self, handle: &ImageHandle, out: &mut dyn Write) -> Result<(), ImageError> {
        self.driver().display_to(handle, out)
    }

    pub fn validate_handle(self, handle: &ImageHandle) -> Result<(), ImageError> {
        self.driver().validate_handle(handle)
    }

    pub fn file_extension(self) -> &'static str {
        self.driver().file_extension()
    }

    pub fn mime_type(self) -> &'static str {
        self.driver().mime_type()
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
