//! Srcset planning: which variants to generate for a source image.
//!
//! All functions here are pure and testable without any I/O or images.
//! The planner decides *what* to produce; [`crate::assets`] decides *how*
//! (chained re-encoding order) and [`crate::transcode`] does the pixel work.

use crate::transcode::Quality;
use crate::types::Size;

/// One candidate output resolution in the srcset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcSetSpec {
    /// Target width in pixels. Variants are skipped for sources narrower
    /// than this — upsampling only wastes space.
    pub max_width: u32,
    pub quality: Quality,
    /// Whether a cheap scale (rather than a proper resample) is acceptable
    /// at this size.
    pub fast: bool,
    /// Presentation order within the srcset. Lower is higher priority; the
    /// highest-priority entry becomes the default.
    pub priority: u32,
}

impl SrcSetSpec {
    pub const fn new(max_width: u32, quality: Quality, fast: bool, priority: u32) -> Self {
        Self {
            max_width,
            quality,
            fast,
            priority,
        }
    }
}

/// Default srcset table.
///
/// 1100w is the preferred default — large enough for most viewports without
/// shipping the 2000w rendition to everyone. Small sizes tolerate the fast
/// scale operation; quality differences are imperceptible there.
pub const DEFAULT_SRCSET_SPEC: &[SrcSetSpec] = &[
    SrcSetSpec::new(2000, Quality::new(85), false, 3),
    SrcSetSpec::new(1100, Quality::new(80), false, 0),
    SrcSetSpec::new(800, Quality::new(75), false, 1),
    SrcSetSpec::new(650, Quality::new(70), true, 2),
    SrcSetSpec::new(500, Quality::new(65), true, 4),
    SrcSetSpec::new(300, Quality::new(60), true, 5),
];

/// Output dimensions for downsampling `original` to `max_width`.
///
/// Width is exactly `max_width`; height preserves the aspect ratio. The
/// rounding might be off by 1 pixel, which is fine for the browser.
pub fn scaled_size(original: Size, max_width: u32) -> Size {
    debug_assert!(max_width <= original.width);
    let aspect_ratio = f64::from(original.width) / f64::from(original.height);
    let new_height = (f64::from(max_width) / aspect_ratio).round() as u32;
    Size::new(max_width, new_height.max(1))
}

/// A variant the planner decided is worth generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedVariant {
    pub spec: SrcSetSpec,
    pub size: Size,
    pub descriptor: String,
}

/// Plan the variants to generate for a source image.
///
/// Specs wider than the source are dropped, and the result is ordered
/// descending by `max_width` regardless of table order — the execution
/// order the chained re-encoding in [`crate::assets`] depends on. The
/// caller reorders by `priority` when assembling the final srcset.
///
/// An empty plan (source narrower than every spec) is the caller's problem:
/// it must be treated as a fatal build error, never a silent no-op.
pub fn plan_variants(source: Size, table: &[SrcSetSpec]) -> Vec<PlannedVariant> {
    let mut specs: Vec<SrcSetSpec> = table
        .iter()
        .copied()
        .filter(|spec| spec.max_width <= source.width)
        .collect();
    specs.sort_by(|a, b| b.max_width.cmp(&a.max_width));

    specs
        .into_iter()
        .map(|spec| {
            let size = scaled_size(source, spec.max_width);
            let descriptor = format!("{}w", size.width);
            PlannedVariant {
                spec,
                size,
                descriptor,
            }
        })
        .collect()
}
