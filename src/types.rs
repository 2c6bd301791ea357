//! Shared value types for the asset pipeline.
//!
//! These types flow between discovery, asset building, and the frozen
//! srcset manifest that the page renderer consumes, so they are all
//! serde-derived and serialized as part of `srcsets.json`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::urls::UrlPath;

/// Pixel dimensions of an image. Both dimensions are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Opaque key identifying one source image across the whole build.
///
/// General images use their `/`-normalized relative path (e.g.
/// `"banner/hero.jpg"`); photo images live in a separate `photo/` namespace
/// derived from the photo's ID. See [`crate::urls`] for the derivations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdError {
    #[error("photo ID must not be empty")]
    Empty,
    #[error("photo ID must not contain path separators: {0:?}")]
    PathSeparator(String),
}

/// Unique ID of a cataloged photo.
///
/// Distinct namespace from [`ImageId`] — a photo's image is registered under
/// an ImageId derived from this. Path separators are rejected because the
/// ID becomes a single path segment in asset URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdError::Empty);
        }
        if id.contains('/') || id.contains('\\') {
            return Err(IdError::PathSeparator(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rendition within a srcset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrcSetEntry {
    pub url: UrlPath,
    pub size: Size,
    /// Width descriptor embedded in the filename and the markup, e.g. `800w`.
    pub descriptor: String,
}

/// The set of alternate-resolution renditions of one image, plus a default.
///
/// Never empty: an image with zero usable variants is a build failure, caught
/// in [`crate::assets`] before an `ImageSrcSet` is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSrcSet {
    entries: Vec<SrcSetEntry>,
    default_index: usize,
}

impl ImageSrcSet {
    pub fn new(entries: Vec<SrcSetEntry>, default_index: usize) -> Self {
        debug_assert!(!entries.is_empty());
        debug_assert!(default_index < entries.len());
        Self {
            entries,
            default_index,
        }
    }

    pub fn entries(&self) -> &[SrcSetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry a page should use when it picks a single URL.
    pub fn default_entry(&self) -> &SrcSetEntry {
        &self.entries[self.default_index]
    }

    /// The value of an HTML `srcset` attribute for this set.
    pub fn srcset_attribute(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {}", e.url, e.descriptor))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, width: u32, height: u32) -> SrcSetEntry {
        SrcSetEntry {
            url: UrlPath::new(url),
            size: Size::new(width, height),
            descriptor: format!("{width}w"),
        }
    }

    #[test]
    fn photo_id_rejects_empty() {
        assert_eq!(PhotoId::new(""), Err(IdError::Empty));
    }

    #[test]
    fn photo_id_rejects_path_separators() {
        assert!(matches!(PhotoId::new("a/b"), Err(IdError::PathSeparator(_))));
        assert!(matches!(
            PhotoId::new("a\\b"),
            Err(IdError::PathSeparator(_))
        ));
    }

    #[test]
    fn photo_id_accepts_plain_name() {
        let id = PhotoId::new("20240815sunset.jpg").unwrap();
        assert_eq!(id.as_str(), "20240815sunset.jpg");
    }

    #[test]
    fn srcset_default_entry() {
        let srcset = ImageSrcSet::new(
            vec![
                entry("/a-1100w.jpg", 1100, 733),
                entry("/a-800w.jpg", 800, 533),
            ],
            0,
        );
        assert_eq!(srcset.default_entry().descriptor, "1100w");
    }

    #[test]
    fn srcset_attribute_joins_entries() {
        let srcset = ImageSrcSet::new(
            vec![
                entry("/a-1100w.jpg", 1100, 733),
                entry("/a-800w.jpg", 800, 533),
            ],
            0,
        );
        assert_eq!(
            srcset.srcset_attribute(),
            "/a-1100w.jpg 1100w, /a-800w.jpg 800w"
        );
    }

    #[test]
    fn size_serializes_as_object() {
        let json = serde_json::to_string(&Size::new(2000, 1500)).unwrap();
        assert_eq!(json, r#"{"width":2000,"height":1500}"#);
    }
}
