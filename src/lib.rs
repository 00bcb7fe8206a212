//! # 图片容器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  调用方                                                  │
//! │    Image::load / load_from_resource / store / display    │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ container ─── Image（文件名 + 类型 + 独占句柄）       │
//! │  │      ↓ 转发                                           │
//! │  ├─ image_type ── ImageType { Png, Dummy }               │
//! │  │      ↓         DriverRegistry（进程级、只读）          │
//! │  ├─ driver ────── ImageDriver                            │
//! │  │   ├─ png       image crate 编解码 + 签名 / 尺寸校验   │
//! │  │   └─ dummy     内存桩驱动（测试用）                   │
//! │  │                                                       │
//! │  ├─ resource ──── ResourceLoader（URI → 本地路径）        │
//! │  ├─ config ────── DriverConfig（上限 + 压缩档位）         │
//! │  └─ error ─────── ImageError（统一错误类型）              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`container`] | `Image` 门面，所有操作转发给类型驱动 |
//! | [`image_type`] | 封闭类型枚举与进程级驱动注册表 |
//! | [`driver`] | 驱动能力接口与 PNG / Dummy 实现 |
//! | [`handle`] | 已解码位图的独占句柄 |
//! | [`resource`] | 资源 URI 解析 |
//! | [`config`] | 驱动配置与 JSON 加载 |
//! | [`error`] | 统一错误类型 `ImageError` |
//!
//! ## 快速上手
//!
//! ```rust,no_run
//! use image_container::{Image, ImageType};
//!
//! let image = Image::load("photo.png", ImageType::Png)?;
//! assert_eq!(image.file_extension(), ".png");
//! image.store("out.png")?;
//! # Ok::<(), image_container::ImageError>(())
//! ```

pub mod config;
pub mod container;
pub mod driver;
pub mod error;
pub mod handle;
pub mod image_type;
pub mod resource;

pub use config::{CompressionProfile, DriverConfig};
pub use container::Image;
pub use driver::{DummyImageDriver, ImageDriver, PngImageDriver};
pub use error::ImageError;
pub use handle::ImageHandle;
pub use image_type::{DriverRegistry, ImageType};
pub use resource::{ResourceLoader, RootedResourceLoader};
