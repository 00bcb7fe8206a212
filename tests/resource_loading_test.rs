// Loading images through resource URIs
use image::{ImageFormat, Rgba, RgbaImage};
use image_container::{Image, ImageError, ImageType, ResourceLoader, RootedResourceLoader};
use std::path::{Path, PathBuf};

fn write_logo(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create resource dir failed");
    }
    RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]))
        .save_with_format(path, ImageFormat::Png)
        .expect("write logo failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_load_matches_direct_load() {
        let dir = tempfile::tempdir().expect("create temp dir failed");
        let logo = dir.path().join("logo.png");
        write_logo(&logo);

        let resolved = logo.clone();
        let loader = move |uri: &str| -> Result<PathBuf, ImageError> {
            if uri == "classpath://img/logo.png" {
                Ok(resolved.clone())
            } else {
                Err(ImageError::ResourceNotFound(uri.to_string()))
            }
        };

        let via_resource = Image::load_from_resource("classpath://img/logo.png", &loader, ImageType::Png)
            .expect("load from resource failed");
        let direct = Image::load(&logo, ImageType::Png).expect("direct load failed");

        assert_eq!(via_resource, direct);
        assert_eq!(via_resource.file_name(), logo.as_path());
    }

    #[test]
    fn unresolvable_resource_is_not_found() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        let loader = RootedResourceLoader::new([root.path()]);

        let result = Image::load_from_resource("classpath://img/absent.png", &loader, ImageType::Png);

        assert!(matches!(result, Err(ImageError::ResourceNotFound(_))));
    }

    #[test]
    fn rooted_loader_feeds_png_driver() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        write_logo(&root.path().join("img/logo.png"));
        let loader = RootedResourceLoader::new([root.path()]);

        let image = Image::load_from_resource("classpath://img/logo.png", &loader, ImageType::Png)
            .expect("load from resource failed");

        assert_eq!(image.file_name(), root.path().join("img/logo.png").as_path());
        assert_eq!(image.handle().map(|h| h.dimensions()), Some((4, 4)));
    }

    #[test]
    fn loader_can_be_used_as_trait_object() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        write_logo(&root.path().join("logo.png"));
        let loader: Box<dyn ResourceLoader> = Box::new(RootedResourceLoader::new([root.path()]));

        let image = Image::load_from_resource("res://logo.png", loader.as_ref(), ImageType::Png)
            .expect("load from resource failed");

        assert_eq!(image.image_type(), ImageType::Png);
    }

    #[test]
    fn driver_errors_after_resolution_propagate() {
        let root = tempfile::tempdir().expect("create temp dir failed");
        std::fs::write(root.path().join("broken.png"), b"not a png at all").expect("write failed");
        let loader = RootedResourceLoader::new([root.path()]);

        let result = Image::load_from_resource("res://broken.png", &loader, ImageType::Png);

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }
}
