//! Per-image asset building: original publish, srcset planning, chained
//! re-encoding, and the final BuildState commit.
//!
//! One entry point handles both general images and cataloged photos — the
//! two differ only in ID derivation, whether the original is published, and
//! whether a photo mapping is recorded, so they share a single [`AssetJob`]
//! with a tagged [`AssetKind`] instead of two near-duplicate code paths.
//!
//! ## Chained re-encoding
//!
//! Re-encoding a very large original repeatedly dominates build time, so
//! smaller variants reuse already-produced output as their source:
//!
//! - the **largest** variant is re-encoded from the true original;
//! - every **middle** variant is re-encoded from the largest variant — one
//!   extra generation of quality loss, far cheaper than touching the
//!   original again;
//! - the **smallest** variant is re-encoded from the second-smallest, where
//!   quality differences are imperceptible anyway.
//!
//! With fewer than three planned variants the chain degenerates and every
//! variant is re-encoded directly from the original.
//!
//! Failure anywhere aborts this image's build without touching BuildState —
//! no entry is better than a partial entry.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::build_dir::{BuildDirError, BuildDirectory};
use crate::srcset::{SrcSetSpec, plan_variants};
use crate::state::{BuildState, StateError};
use crate::transcode::{ReencodeParams, TranscodeError, Transcoder, ensure_jpeg_output};
use crate::types::{ImageId, ImageSrcSet, PhotoId, Size, SrcSetEntry};
use crate::urls::{image_base_url, image_srcset_url, photo_image_id};

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("empty srcset for image \"{0}\" — source too small for every spec")]
    EmptySrcSet(ImageId),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error(transparent)]
    BuildDir(#[from] BuildDirError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// What kind of source image a job describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    /// Decorative site image; only srcset variants are published.
    General,
    /// Cataloged photo; the original is also published for download, and a
    /// photo → image mapping is recorded.
    Photo { photo_id: PhotoId },
}

/// One image's worth of asset-building work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetJob {
    pub source_path: PathBuf,
    pub image_id: ImageId,
    pub kind: AssetKind,
    /// Pixel size when the caller already knows it (photos carry this from
    /// metadata extraction); avoids a redundant header decode.
    pub known_size: Option<Size>,
    /// Publish the original file verbatim at the base URL.
    pub build_original: bool,
}

impl AssetJob {
    pub fn general(source_path: impl Into<PathBuf>, image_id: ImageId) -> Self {
        Self {
            source_path: source_path.into(),
            image_id,
            kind: AssetKind::General,
            known_size: None,
            build_original: false,
        }
    }

    pub fn photo(
        source_path: impl Into<PathBuf>,
        photo_id: PhotoId,
        known_size: Option<Size>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            image_id: photo_image_id(&photo_id),
            kind: AssetKind::Photo { photo_id },
            known_size,
            build_original: true,
        }
    }
}

/// Everything a worker needs to build one image's assets.
pub struct AssetContext<'a> {
    pub build_dir: &'a BuildDirectory,
    pub state: &'a BuildState,
    pub transcoder: &'a dyn Transcoder,
    pub spec_table: &'a [SrcSetSpec],
    /// Skip the spec table entirely: one symlinked native-width variant.
    pub fast: bool,
}

/// Build all assets for one image and commit the resulting srcset.
///
/// Returns the committed srcset so callers can report what was produced.
pub fn build_image_asset(
    ctx: &AssetContext<'_>,
    job: &AssetJob,
) -> Result<ImageSrcSet, AssetError> {
    let base_url = image_base_url(&job.image_id);

    if job.build_original {
        ctx.build_dir.build_file(&job.source_path, &base_url)?;
    }

    let size = match job.known_size {
        Some(size) => size,
        None => ctx.transcoder.probe_size(&job.source_path)?,
    };

    let entries = if ctx.fast {
        build_fast_entry(ctx, job, &base_url, size)?
    } else {
        build_srcset_entries(ctx, job, &base_url, size)?
    };

    if entries.is_empty() {
        return Err(AssetError::EmptySrcSet(job.image_id.clone()));
    }
    // Highest priority first; it doubles as the default entry.
    let srcset = ImageSrcSet::new(entries, 0);

    let photo_id = match &job.kind {
        AssetKind::Photo { photo_id } => Some(photo_id.clone()),
        AssetKind::General => None,
    };
    ctx.state
        .commit(job.image_id.clone(), srcset.clone(), photo_id)?;
    Ok(srcset)
}

/// Fast mode: no re-encoding at all. Publish the original under a
/// native-width descriptor so pages still get a well-formed srcset.
fn build_fast_entry(
    ctx: &AssetContext<'_>,
    job: &AssetJob,
    base_url: &crate::urls::UrlPath,
    size: Size,
) -> Result<Vec<SrcSetEntry>, AssetError> {
    let descriptor = format!("{}w", size.width);
    let url = image_srcset_url(base_url, &descriptor);
    ctx.build_dir.build_file(&job.source_path, &url)?;
    Ok(vec![SrcSetEntry {
        url,
        size,
        descriptor,
    }])
}

/// Full srcset generation with chained re-encoding.
fn build_srcset_entries(
    ctx: &AssetContext<'_>,
    job: &AssetJob,
    base_url: &crate::urls::UrlPath,
    size: Size,
) -> Result<Vec<SrcSetEntry>, AssetError> {
    let planned = plan_variants(size, ctx.spec_table);
    if planned.is_empty() {
        return Err(AssetError::EmptySrcSet(job.image_id.clone()));
    }
    // The smallest-from-second-smallest rule needs at least three links to
    // mean anything; below that, everything comes from the original.
    let chained = planned.len() >= 3;

    let mut entries: Vec<(u32, SrcSetEntry)> = Vec::with_capacity(planned.len());
    let mut chain_base: Option<PathBuf> = None;
    let mut prev_dest: Option<PathBuf> = None;

    for (idx, variant) in planned.iter().enumerate() {
        let url = image_srcset_url(base_url, &variant.descriptor);
        // Configuration check before any transcoder invocation (and in
        // dry-run mode, where the transcoder never runs at all).
        ensure_jpeg_output(&url.fs_path())?;
        let dest = ctx.build_dir.prepare_file(&url.fs_path())?;

        let reencode_source: &Path = match &chain_base {
            // Largest variant: always from the true original.
            None => &job.source_path,
            Some(_) if !chained => &job.source_path,
            Some(base) => {
                if idx == planned.len() - 1 {
                    // Smallest variant: from the second-smallest.
                    prev_dest.as_deref().unwrap_or(base.as_path())
                } else {
                    // Middle variants: from the largest produced.
                    base
                }
            }
        };

        if !ctx.build_dir.dry_run() {
            ctx.transcoder.reencode(&ReencodeParams {
                source: reencode_source.to_path_buf(),
                dest: dest.clone(),
                max_width: variant.spec.max_width,
                quality: variant.spec.quality,
                fast: variant.spec.fast,
            })?;
        }

        if chain_base.is_none() {
            chain_base = Some(dest.clone());
        }
        prev_dest = Some(dest);
        entries.push((
            variant.spec.priority,
            SrcSetEntry {
                url,
                size: variant.size,
                descriptor: variant.descriptor.clone(),
            },
        ));
    }

    entries.sort_by_key(|(priority, _)| *priority);
    Ok(entries.into_iter().map(|(_, entry)| entry).collect())
}
