//! Destination-URL scheme for built assets.
//!
//! Every built file is addressed by a site-absolute [`UrlPath`] which doubles
//! as its location inside the build directory ([`UrlPath::fs_path`]). Image
//! assets live under `/asset/image/`:
//!
//! ```text
//! /asset/image/banner/hero.jpg           # general image, base URL
//! /asset/image/banner/hero-800w.jpg      # srcset variant
//! /asset/image/photo/20240815dusk.jpg    # photo image, base URL
//! /asset/image/photo/20240815dusk-500w.jpg
//! ```
//!
//! Srcset variant URLs are formed by inserting `-<descriptor>` before the
//! file extension of the base URL.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{ImageId, PhotoId};

/// A site-absolute URL path, always `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlPath(String);

impl UrlPath {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        debug_assert!(path.starts_with('/'));
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a relative segment (which may itself contain `/`).
    pub fn join(&self, segment: &str) -> Self {
        debug_assert!(!segment.starts_with('/'));
        Self(format!("{}/{}", self.0.trim_end_matches('/'), segment))
    }

    /// The final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// The location of this URL relative to the build directory root.
    pub fn fs_path(&self) -> PathBuf {
        self.0.trim_start_matches('/').split('/').collect()
    }

    /// Replace the final path segment.
    fn with_file_name(&self, name: &str) -> Self {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => Self(format!("{parent}/{name}")),
            None => Self(format!("/{name}")),
        }
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Root for all image assets, general and photo alike.
pub const ASSETS_IMAGE_URL: &str = "/asset/image";

/// Sub-namespace of image IDs reserved for photo-derived images.
pub const PHOTO_IMAGE_DIR: &str = "photo";

/// Base output URL for an image, before any srcset descriptor is applied.
pub fn image_base_url(image_id: &ImageId) -> UrlPath {
    debug_assert!(!image_id.as_str().starts_with('/'));
    UrlPath::new(ASSETS_IMAGE_URL).join(image_id.as_str())
}

/// URL of one srcset variant: `-<descriptor>` inserted before the extension.
pub fn image_srcset_url(base_url: &UrlPath, descriptor: &str) -> UrlPath {
    debug_assert!(descriptor.chars().all(|c| c.is_ascii_alphanumeric()));
    let name = base_url.file_name();
    let tagged = match name.split_once('.') {
        Some((stem, rest)) => format!("{stem}-{descriptor}.{rest}"),
        None => format!("{name}-{descriptor}"),
    };
    base_url.with_file_name(&tagged)
}

/// The ImageId a general image is registered under: its `/`-normalized
/// relative path within the image resource directory.
pub fn general_image_id(relative_path: &Path) -> ImageId {
    debug_assert!(relative_path.is_relative());
    let normalized: Vec<&str> = relative_path
        .components()
        .map(|c| c.as_os_str().to_str().unwrap_or(""))
        .collect();
    ImageId::new(normalized.join("/"))
}

/// The ImageId a photo's image is registered under.
///
/// PhotoId construction already rejects path separators, so the joined ID
/// cannot escape the `photo/` namespace.
pub fn photo_image_id(photo_id: &PhotoId) -> ImageId {
    ImageId::new(format!("{PHOTO_IMAGE_DIR}/{photo_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_for_general_image() {
        let id = general_image_id(Path::new("banner/hero.jpg"));
        assert_eq!(id.as_str(), "banner/hero.jpg");
        assert_eq!(
            image_base_url(&id).as_str(),
            "/asset/image/banner/hero.jpg"
        );
    }

    #[test]
    fn photo_image_id_is_namespaced() {
        let photo_id = PhotoId::new("20240815dusk.jpg").unwrap();
        let id = photo_image_id(&photo_id);
        assert_eq!(id.as_str(), "photo/20240815dusk.jpg");
        assert_eq!(
            image_base_url(&id).as_str(),
            "/asset/image/photo/20240815dusk.jpg"
        );
    }

    #[test]
    fn srcset_url_inserts_descriptor_before_extension() {
        let base = UrlPath::new("/asset/image/banner/hero.jpg");
        assert_eq!(
            image_srcset_url(&base, "800w").as_str(),
            "/asset/image/banner/hero-800w.jpg"
        );
    }

    #[test]
    fn srcset_url_tags_first_dot_for_multi_extension_names() {
        let base = UrlPath::new("/asset/image/a.orig.jpg");
        assert_eq!(
            image_srcset_url(&base, "500w").as_str(),
            "/asset/image/a-500w.orig.jpg"
        );
    }

    #[test]
    fn srcset_url_without_extension_appends() {
        let base = UrlPath::new("/asset/image/hero");
        assert_eq!(
            image_srcset_url(&base, "300w").as_str(),
            "/asset/image/hero-300w"
        );
    }

    #[test]
    fn fs_path_strips_leading_slash() {
        let url = UrlPath::new("/asset/image/hero.jpg");
        assert_eq!(url.fs_path(), PathBuf::from("asset/image/hero.jpg"));
    }

    #[test]
    fn join_handles_trailing_slash() {
        assert_eq!(UrlPath::new("/asset/").join("x.jpg").as_str(), "/asset/x.jpg");
    }
}
