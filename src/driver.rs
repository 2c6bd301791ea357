//! Parallel execution of asset-building jobs.
//!
//! Images are independent — each job's chaining reuses only its own
//! just-produced variants — so the whole set fans out across the rayon
//! pool. `try_for_each` gives the error policy the pipeline wants: the
//! first fatal error stops new jobs from being scheduled and is surfaced
//! to the caller, while jobs already in flight run to completion. No
//! mid-task cancellation; a re-encode is never interrupted.

use std::sync::mpsc::Sender;

use rayon::prelude::*;

use crate::assets::{AssetContext, AssetError, AssetJob, AssetKind, build_image_asset};
use crate::output::BuildEvent;

/// Build all images' assets in parallel.
///
/// On success every job's srcset has been committed to the context's
/// BuildState. On error, the first failure is returned; BuildState then
/// holds only fully built entries (never partial ones).
pub fn build_all_assets(
    ctx: &AssetContext<'_>,
    jobs: &[AssetJob],
    events: Option<Sender<BuildEvent>>,
) -> Result<(), AssetError> {
    jobs.par_iter().try_for_each_with(events, |events, job| {
        let srcset = build_image_asset(ctx, job)?;
        if let Some(tx) = events {
            // The printer thread may have gone away; losing progress
            // output is not an error.
            let _ = tx.send(BuildEvent::image_built(&job.image_id, &srcset, ctx.fast));
        }
        Ok(())
    })
}

/// Jobs for the full build: general images first, then cataloged photos.
pub fn collect_jobs(
    general: impl IntoIterator<Item = AssetJob>,
    photos: impl IntoIterator<Item = AssetJob>,
) -> Vec<AssetJob> {
    let mut jobs: Vec<AssetJob> = general.into_iter().collect();
    jobs.extend(photos);
    debug_assert!(
        jobs.iter()
            .filter(|j| matches!(j.kind, AssetKind::Photo { .. }))
            .all(|j| j.build_original)
    );
    jobs
}
