//! # 资源解析模块
//!
//! ## 设计思路
//!
//! `Image::load_from_resource` 不关心资源放在哪里，只依赖 `ResourceLoader`
//! 把 URI 解析为本地路径。调用方可以注入任意实现（包括闭包）。
//!
//! ## 实现思路
//!
//! `RootedResourceLoader` 按顺序在若干根目录下查找相对路径：
//! - 支持 `scheme://relative/path` 与裸相对路径两种写法，scheme 只做剥离。
//! - 绝对路径、空路径与 `..` 一律拒绝，防止逃逸出根目录。
//! - 第一个存在该文件的根目录胜出；都找不到时返回 `ResourceNotFound`。

use std::path::{Component, Path, PathBuf};

use crate::error::ImageError;

/// 资源 URI → 本地路径的解析器。
pub trait ResourceLoader {
    fn resolve(&self, uri: &str) -> Result<PathBuf, ImageError>;
}

impl<F> ResourceLoader for F
where
    F: Fn(&str) -> Result<PathBuf, ImageError>,
{
    fn resolve(&self, uri: &str) -> Result<PathBuf, ImageError> {
        self(uri)
    }
}

/// 在一组根目录下查找资源的解析器。
#[derive(Debug, Clone, Default)]
pub struct RootedResourceLoader {
    roots: Vec<PathBuf>,
}

impl RootedResourceLoader {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// 追加一个根目录（优先级低于已有根目录）。
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// scheme 以字母开头，后续只允许字母、数字与 `+ - .`。
    fn is_scheme(candidate: &str) -> bool {
        let mut chars = candidate.chars();
        chars.next().is_some_and(|first| first.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    }

    /// 剥离 scheme 并校验相对路径。
    fn relative_path(uri: &str) -> Result<&Path, ImageError> {
        let trimmed = uri.trim();
        let path_part = match trimmed.split_once("://") {
            Some((scheme, rest)) if Self::is_scheme(scheme) => rest,
            _ => trimmed,
        };

        if path_part.is_empty() {
            return Err(ImageError::ResourceNotFound(format!("资源路径为空：{}", uri)));
        }

        let relative = Path::new(path_part);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if !is_plain {
            log::warn!("⚠️ 拒绝越界资源路径：{}", uri);
            return Err(ImageError::ResourceNotFound(format!(
                "资源路径必须是根目录内的相对路径：{}",
                uri
            )));
        }

        Ok(relative)
    }
}

impl ResourceLoader for RootedResourceLoader {
    fn resolve(&self, uri: &str) -> Result<PathBuf, ImageError> {
        let relative = Self::relative_path(uri)?;

        for root in &self.roots {
            let candidate = root.join(relative);
            if candidate.is_file() {
                log::debug!("🔎 资源已解析 - URI: {} 路径: {}", uri, candidate.display());
                return Ok(candidate);
            }
        }

        Err(ImageError::ResourceNotFound(format!(
            "在 {} 个根目录中均未找到资源：{}",
            self.roots.len(),
            uri
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_scheme_uri_against_first_matching_root() {
        let first = tempfile::tempdir().expect("create temp dir failed");
        let second = tempfile::tempdir().expect("create temp dir failed");
        std::fs::create_dir_all(second.path().join("img")).expect("create dir failed");
        std::fs::write(second.path().join("img/logo.png"), b"x").expect("write failed");

        let loader = RootedResourceLoader::new([first.path()]).with_root(second.path());
        let resolved = loader.resolve("classpath://img/logo.png").expect("resolve failed");

        assert_eq!(resolved, second.path().join("img/logo.png"));
    }

    #[test]
    fn earlier_root_wins() {
        let first = tempfile::tempdir().expect("create temp dir failed");
        let second = tempfile::tempdir().expect("create temp dir failed");
        std::fs::write(first.path().join("a.png"), b"1").expect("write failed");
        std::fs::write(second.path().join("a.png"), b"2").expect("write failed");

        let loader = RootedResourceLoader::new([first.path(), second.path()]);

        assert_eq!(loader.resolve("a.png").expect("resolve failed"), first.path().join("a.png"));
    }

    #[test]
    fn missing_resource_is_not_found() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        let loader = RootedResourceLoader::new([root.path()]);

        assert!(matches!(
            loader.resolve("res://img/missing.png"),
            Err(ImageError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn traversal_and_absolute_paths_are_rejected() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        let loader = RootedResourceLoader::new([root.path()]);

        for uri in ["classpath://../secret.png", "/etc/passwd", "res:///etc/passwd", "", "res://"] {
            assert!(
                matches!(loader.resolve(uri), Err(ImageError::ResourceNotFound(_))),
                "uri should be rejected: {uri:?}"
            );
        }
    }

    #[test]
    fn only_well_formed_schemes_are_stripped() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        std::fs::write(root.path().join("b.png"), b"x").expect("write failed");
        let loader = RootedResourceLoader::new([root.path()]);

        assert!(matches!(
            loader.resolve("img/a://b.png"),
            Err(ImageError::ResourceNotFound(_))
        ));
        assert!(matches!(
            loader.resolve("1res://b.png"),
            Err(ImageError::ResourceNotFound(_))
        ));
        assert_eq!(
            loader.resolve("my-res+v1.0://b.png").expect("resolve failed"),
            root.path().join("b.png")
        );
    }

    #[test]
    fn scheme_tokens_are_validated() {
        assert!(RootedResourceLoader::is_scheme("classpath"));
        assert!(RootedResourceLoader::is_scheme("svn+ssh"));
        assert!(!RootedResourceLoader::is_scheme(""));
        assert!(!RootedResourceLoader::is_scheme("img/a"));
        assert!(!RootedResourceLoader::is_scheme("9p"));
    }

    #[test]
    fn directories_do_not_count_as_resources() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        std::fs::create_dir_all(root.path().join("img")).expect("create dir failed");
        let loader = RootedResourceLoader::new([root.path()]);

        assert!(loader.resolve("img").is_err());
    }

    #[test]
    fn closures_act_as_loaders() {
        let loader = |uri: &str| -> Result<PathBuf, ImageError> {
            Ok(PathBuf::from("/tmp").join(uri.trim_start_matches("mem://")))
        };

        assert_eq!(
            loader.resolve("mem://x.png").expect("resolve failed"),
            PathBuf::from("/tmp/x.png")
        );
    }
}
