//! CLI output formatting for the build pipeline.
//!
//! Workers never print directly — they send [`BuildEvent`]s over an mpsc
//! channel and a printer thread in `main` formats them. This keeps per-image
//! output lines whole under parallel execution.
//!
//! ```text
//! photo/20240815dusk.jpg
//!     variants: 1100w 800w 650w 2000w 500w 300w
//! banner/hero.jpg
//!     variants: 1920w (fast)
//! ```

use crate::state::StateManifest;
use crate::types::{ImageId, ImageSrcSet};

/// Progress event emitted by asset-building workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    ImageBuilt {
        image_id: ImageId,
        descriptors: Vec<String>,
        fast: bool,
    },
}

impl BuildEvent {
    pub fn image_built(image_id: &ImageId, srcset: &ImageSrcSet, fast: bool) -> Self {
        Self::ImageBuilt {
            image_id: image_id.clone(),
            descriptors: srcset
                .entries()
                .iter()
                .map(|e| e.descriptor.clone())
                .collect(),
            fast,
        }
    }
}

/// Format one event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::ImageBuilt {
            image_id,
            descriptors,
            fast,
        } => {
            let suffix = if *fast { " (fast)" } else { "" };
            vec![
                image_id.to_string(),
                format!("    variants: {}{}", descriptors.join(" "), suffix),
            ]
        }
    }
}

/// Summary printed after the parallel phase has joined.
pub fn format_build_summary(manifest: &StateManifest) -> String {
    let variants: usize = manifest.image_srcsets.values().map(|s| s.len()).sum();
    format!(
        "Built {} images ({} variants, {} photos)",
        manifest.image_srcsets.len(),
        variants,
        manifest.photo_to_image.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Size, SrcSetEntry};
    use crate::urls::UrlPath;

    fn srcset() -> ImageSrcSet {
        ImageSrcSet::new(
            vec![
                SrcSetEntry {
                    url: UrlPath::new("/a-1100w.jpg"),
                    size: Size::new(1100, 733),
                    descriptor: "1100w".to_string(),
                },
                SrcSetEntry {
                    url: UrlPath::new("/a-800w.jpg"),
                    size: Size::new(800, 533),
                    descriptor: "800w".to_string(),
                },
            ],
            0,
        )
    }

    #[test]
    fn image_built_lines() {
        let event = BuildEvent::image_built(&ImageId::new("banner/hero.jpg"), &srcset(), false);
        assert_eq!(
            format_build_event(&event),
            vec![
                "banner/hero.jpg".to_string(),
                "    variants: 1100w 800w".to_string()
            ]
        );
    }

    #[test]
    fn fast_builds_are_tagged() {
        let event = BuildEvent::image_built(&ImageId::new("hero.jpg"), &srcset(), true);
        let lines = format_build_event(&event);
        assert!(lines[1].ends_with("(fast)"));
    }

    #[test]
    fn summary_counts_images_and_variants() {
        let state = crate::state::BuildState::new();
        state
            .commit(ImageId::new("hero.jpg"), srcset(), None)
            .unwrap();
        let manifest = state.into_manifest();
        assert_eq!(
            format_build_summary(&manifest),
            "Built 1 images (2 variants, 0 photos)"
        );
    }
}
