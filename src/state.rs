//! Shared build state populated during the asset-building phase.
//!
//! Two write-once maps: image ID → srcset, and photo ID → image ID. Many
//! workers insert concurrently, but each key is written by exactly one
//! worker exactly once — a second insert under the same key is a fatal
//! error, surfaced as a bug in upstream ID derivation rather than silently
//! overwritten. Both checks and inserts happen under one mutex acquisition,
//! so duplicate detection is race-free.
//!
//! After the parallel phase joins, [`BuildState::into_manifest`] consumes
//! the state into a plain, serializable snapshot. Consuming (rather than
//! borrowing) makes "reads only after all writers finished" a type-level
//! guarantee.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::types::{ImageId, ImageSrcSet, PhotoId};

#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("duplicate image srcset: {0}")]
    DuplicateSrcSet(ImageId),
    #[error("duplicate photo mapping: {0}")]
    DuplicatePhoto(PhotoId),
}

#[derive(Debug, Default, Serialize)]
struct StateMaps {
    image_srcsets: BTreeMap<ImageId, ImageSrcSet>,
    photo_to_image: BTreeMap<PhotoId, ImageId>,
}

/// Mutable registry shared by all asset-building workers.
#[derive(Debug, Default)]
pub struct BuildState {
    maps: Mutex<StateMaps>,
}

impl BuildState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully built srcset, plus the photo mapping when the image
    /// came from a cataloged photo.
    ///
    /// Atomic: both keys are checked before either map is touched, so a
    /// duplicate leaves no partial entry behind and the first insertion
    /// stays intact.
    pub fn commit(
        &self,
        image_id: ImageId,
        srcset: ImageSrcSet,
        photo_id: Option<PhotoId>,
    ) -> Result<(), StateError> {
        let mut maps = self.maps.lock().expect("build state poisoned");
        if maps.image_srcsets.contains_key(&image_id) {
            return Err(StateError::DuplicateSrcSet(image_id));
        }
        if let Some(photo_id) = &photo_id
            && maps.photo_to_image.contains_key(photo_id)
        {
            return Err(StateError::DuplicatePhoto(photo_id.clone()));
        }
        if let Some(photo_id) = photo_id {
            maps.photo_to_image.insert(photo_id, image_id.clone());
        }
        maps.image_srcsets.insert(image_id, srcset);
        Ok(())
    }

    /// Freeze the state into a read-only snapshot. Call only after the
    /// parallel phase has fully joined.
    pub fn into_manifest(self) -> StateManifest {
        let maps = self.maps.into_inner().expect("build state poisoned");
        StateManifest {
            image_srcsets: maps.image_srcsets,
            photo_to_image: maps.photo_to_image,
        }
    }
}

/// Frozen snapshot of the build state, consumed by page rendering and
/// serialized as `srcsets.json`.
#[derive(Debug, Serialize)]
pub struct StateManifest {
    pub image_srcsets: BTreeMap<ImageId, ImageSrcSet>,
    pub photo_to_image: BTreeMap<PhotoId, ImageId>,
}

impl StateManifest {
    pub fn srcset(&self, image_id: &ImageId) -> Option<&ImageSrcSet> {
        self.image_srcsets.get(image_id)
    }

    pub fn photo_srcset(&self, photo_id: &PhotoId) -> Option<&ImageSrcSet> {
        self.photo_to_image
            .get(photo_id)
            .and_then(|id| self.image_srcsets.get(id))
    }
}
