//! Image re-encoding backend.
//!
//! The [`Transcoder`] trait is the seam between pipeline logic and pixel
//! work, so asset building is testable without touching real images. Two
//! operations:
//!
//! - `probe_size` — read pixel dimensions from the image header.
//! - `reencode` — produce one downsampled JPEG at a target width/quality.
//!
//! The production implementation is [`MagickTranscoder`], which shells out
//! to ImageMagick. We could resize in-process, but ImageMagick is trusted to
//! carry image metadata through re-encoding correctly. Dimension probing
//! stays in-process via `image::image_dimensions` — header-only, no decode.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::types::Size;

/// The only output format the pipeline produces.
pub const OUTPUT_EXTENSION: &str = "jpg";

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("only JPEG output is supported: \"{}\"", .0.display())]
    UnsupportedOutput(PathBuf),
    #[error("transcoder {status} for \"{}\"", dest.display())]
    Failed {
        status: std::process::ExitStatus,
        dest: PathBuf,
    },
    #[error("transcoder reported success but produced no file: \"{}\"", .0.display())]
    MissingOutput(PathBuf),
    #[error("cannot read dimensions of \"{}\": {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub const fn new(value: u32) -> Self {
        // Clamp rather than error: an out-of-range table entry is a typo,
        // not something worth failing a build over.
        let value = if value < 1 {
            1
        } else if value > 100 {
            100
        } else {
            value
        };
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Full specification of one re-encode: source file, destination file,
/// target width, quality, and whether the cheap scale operation suffices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReencodeParams {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub max_width: u32,
    pub quality: Quality,
    pub fast: bool,
}

/// Reject any destination that is not a `.jpg` file.
///
/// Called before the transcoder is ever invoked — a non-JPEG destination is
/// a configuration bug, not a runtime condition.
pub fn ensure_jpeg_output(dest: &Path) -> Result<(), TranscodeError> {
    let ok = dest
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(OUTPUT_EXTENSION));
    if ok {
        Ok(())
    } else {
        Err(TranscodeError::UnsupportedOutput(dest.to_path_buf()))
    }
}

/// Re-encoding capability injected into the asset builder.
pub trait Transcoder: Sync {
    /// Pixel dimensions of an image file.
    fn probe_size(&self, path: &Path) -> Result<Size, TranscodeError>;

    /// Produce `params.dest` from `params.source` at the target width.
    fn reencode(&self, params: &ReencodeParams) -> Result<(), TranscodeError>;
}

/// Production transcoder shelling out to the `magick` binary.
pub struct MagickTranscoder;

impl MagickTranscoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MagickTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder for MagickTranscoder {
    fn probe_size(&self, path: &Path) -> Result<Size, TranscodeError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|source| TranscodeError::Probe {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Size::new(width, height))
    }

    fn reencode(&self, params: &ReencodeParams) -> Result<(), TranscodeError> {
        ensure_jpeg_output(&params.dest)?;
        // `-scale` is a cheap box filter, `-resize` a proper resample.
        // `{width}x` constrains width only; height follows the aspect ratio.
        let operation = if params.fast { "-scale" } else { "-resize" };
        let status = Command::new("magick")
            .arg(&params.source)
            .arg(operation)
            .arg(format!("{}x", params.max_width))
            .arg("-quality")
            .arg(params.quality.value().to_string())
            .arg(&params.dest)
            .status()?;
        if !status.success() {
            return Err(TranscodeError::Failed {
                status,
                dest: params.dest.clone(),
            });
        }
        // A zero exit does not guarantee output; treat a missing file as
        // silent corruption rather than assuming success.
        if !params.dest.is_file() {
            return Err(TranscodeError::MissingOutput(params.dest.clone()));
        }
        Ok(())
    }
}
