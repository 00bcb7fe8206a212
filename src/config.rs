//! # 驱动配置模块
//!
//! ## 设计思路
//!
//! 将所有"可调策略"集中到 `DriverConfig`，驱动在构造时拿到一份快照，
//! 之后不再变化（注册表初始化后不可变）。
//! 压缩档位（fast / balanced / best）作为高层语义，映射到 PNG 编码器参数。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - `CompressionProfile` 负责档位字符串解析与反向输出。
//! - `from_json_str` / `from_json_file` 通过 `serde_json` 读取配置文件，
//!   缺省字段回落到默认值，解析后统一走 `validate`。

use std::fs;
use std::path::Path;

use image::codecs::png::CompressionType;
use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// 解码内存上限允许的最小值。
const MIN_DECODED_BYTES: u64 = 1024 * 1024;

/// 驱动配置。
///
/// 字段覆盖读取、解码与编码三个阶段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// PNG 编码压缩档位。
    pub compression: CompressionProfile,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            compression: CompressionProfile::Balanced,
        }
    }
}

impl DriverConfig {
    /// 从 JSON 文本解析配置。
    ///
    /// # 示例
    /// ```rust
    /// use image_container::DriverConfig;
    ///
    /// let config = DriverConfig::from_json_str(r#"{ "compression": "best" }"#)?;
    /// assert_eq!(config.compression.as_str(), "best");
    /// # Ok::<(), image_container::ImageError>(())
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self, ImageError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| ImageError::Config(format!("解析配置失败：{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取配置。
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ImageError::Config(format!("读取配置文件 '{}' 失败：{}", path.display(), e))
        })?;
        log::debug!("⚙️ 读取驱动配置 - 路径: {}", path.display());
        Self::from_json_str(&content)
    }

    /// 校验各项上限是否合法。
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.max_file_size == 0 {
            return Err(ImageError::Config("max_file_size 不能为 0".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ImageError::Config("max_decoded_pixels 不能为 0".to_string()));
        }
        if self.max_decoded_bytes < MIN_DECODED_BYTES {
            return Err(ImageError::Config("max_decoded_bytes 不能小于 1MB".to_string()));
        }
        Ok(())
    }
}

/// PNG 压缩档位。
///
/// - `Fast`：优先写入速度
/// - `Balanced`：体积与速度平衡
/// - `Best`：尽量压缩体积
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionProfile {
    Fast,
    Balanced,
    Best,
}

impl CompressionProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use image_container::CompressionProfile;
    ///
    /// let p = CompressionProfile::from_str(" Fast ")?;
    /// assert_eq!(p.as_str(), "fast");
    /// # Ok::<(), image_container::ImageError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "best" => Ok(Self::Best),
            other => Err(ImageError::Config(format!(
                "未知压缩档位：{}（可选：fast / balanced / best）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供日志与持久化使用。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Best => "best",
        }
    }

    pub(crate) fn compression_type(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Balanced => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}
