//! Source-resource discovery.
//!
//! The content directory has two image roots:
//!
//! ```text
//! content/
//! ├── image/          # general site images, any nesting
//! │   └── banner/hero.jpg
//! └── photo/          # cataloged photos, flat
//!     └── 20240815-Dusk.jpg
//! ```
//!
//! General images are identified by their relative path. Photos get a
//! [`PhotoId`] derived from the file name: lowercased, dashes removed, and
//! restricted to ASCII alphanumerics so the ID never needs URL encoding.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::assets::AssetJob;
use crate::types::{IdError, PhotoId};
use crate::urls::general_image_id;

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("cannot walk resources: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("non-UTF-8 file name: \"{}\"", .0.display())]
    NonUtf8Name(PathBuf),
    #[error("photo name must be ASCII alphanumeric (dashes allowed): \"{}\"", .0.display())]
    InvalidPhotoName(PathBuf),
    #[error("invalid photo ID for \"{}\": {source}", path.display())]
    PhotoId {
        path: PathBuf,
        #[source]
        source: IdError,
    },
}

pub fn general_image_dir(content_dir: &Path) -> PathBuf {
    content_dir.join("image")
}

pub fn photo_dir(content_dir: &Path) -> PathBuf {
    content_dir.join("photo")
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SUPPORTED_IMAGE_EXTENSIONS
                .iter()
                .any(|s| e.eq_ignore_ascii_case(s))
        })
}

/// Walk a root for supported image files, sorted by name for deterministic
/// job order. A missing root yields no files — an empty resource set is
/// legitimate, unlike an empty srcset.
fn find_images(root: &Path) -> Result<Vec<PathBuf>, ResourceError> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_supported_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Jobs for all general images under `<content>/image/`.
pub fn discover_general_images(content_dir: &Path) -> Result<Vec<AssetJob>, ResourceError> {
    let root = general_image_dir(content_dir);
    let mut jobs = Vec::new();
    for full_path in find_images(&root)? {
        let relative = full_path
            .strip_prefix(&root)
            .expect("walked path is under its root");
        if relative.to_str().is_none() {
            return Err(ResourceError::NonUtf8Name(full_path));
        }
        let image_id = general_image_id(relative);
        jobs.push(AssetJob::general(full_path, image_id));
    }
    Ok(jobs)
}

/// Derive a photo's ID from its file name.
///
/// `20240815-Dusk.jpg` → `20240815dusk.jpg`. The stem keeps its extension so
/// srcset URLs have somewhere to put the descriptor.
pub fn photo_id_from_path(path: &Path) -> Result<PhotoId, ResourceError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ResourceError::NonUtf8Name(path.to_path_buf()))?;
    let (stem, extension) = name
        .split_once('.')
        .ok_or_else(|| ResourceError::InvalidPhotoName(path.to_path_buf()))?;
    let stem: String = stem.to_ascii_lowercase().replace('-', "");
    if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ResourceError::InvalidPhotoName(path.to_path_buf()));
    }
    PhotoId::new(format!("{stem}.{}", extension.to_ascii_lowercase())).map_err(|source| {
        ResourceError::PhotoId {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Jobs for all cataloged photos under `<content>/photo/`.
///
/// Sizes are left unknown here; the asset builder probes them. A catalog
/// with richer metadata can construct photo jobs with known sizes instead.
pub fn discover_photos(content_dir: &Path) -> Result<Vec<AssetJob>, ResourceError> {
    let root = photo_dir(content_dir);
    let mut jobs = Vec::new();
    for full_path in find_images(&root)? {
        let photo_id = photo_id_from_path(&full_path)?;
        jobs.push(AssetJob::photo(full_path, photo_id, None));
    }
    Ok(jobs)
}
