//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `ImageError` 枚举，承载驱动层、容器层、资源解析与配置加载
//! 的全部错误来源，调用侧可以按分支匹配，而不是解析字符串。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 外部库错误（`image`、`serde_json`）在调用点通过 `map_err` 映射到对应分支，
//!   只有 `std::io::Error` 提供 `From` 转换（用于输出流写入）。
//! - 容器层不做任何恢复，错误原样透传给调用方。

/// 图片容器统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// 传入的句柄或参数不是当前类型可接受的资源
    #[error("参数错误：{0}")]
    InvalidArgument(String),

    /// 文件签名或内容不是期望的图片格式
    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    /// 文件不存在、不可读或不可写
    #[error("文件错误：{0}")]
    FileSystem(String),

    /// 资源 URI 无法解析为本地路径
    #[error("资源未找到：{0}")]
    ResourceNotFound(String),

    /// 超出配置中的体积 / 像素 / 内存上限
    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("配置错误：{0}")]
    Config(String),

    /// 输出流写入失败
    #[error("输出错误：{0}")]
    Io(#[from] std::io::Error),
}
