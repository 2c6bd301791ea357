//! # photostatic
//!
//! The image asset pipeline of a static photo-gallery site builder. For
//! every source image — decorative site images and cataloged photos alike —
//! it derives a set of resized JPEG variants (a srcset), re-encodes them
//! with a chained strategy that avoids repeatedly touching the large
//! original, writes them into a collision-checked output namespace, and
//! records the resulting variant sets for page rendering.
//!
//! # Pipeline
//!
//! ```text
//! 1. Discover   content/{image,photo}/  →  AssetJob list
//! 2. Build      jobs × rayon pool       →  variants on disk + BuildState
//! 3. Freeze     BuildState              →  srcsets.json (read by rendering)
//! ```
//!
//! Each image is independent: its chaining reuses only its own
//! just-produced variants, so the whole set fans out across a worker pool
//! and the first fatal error halts scheduling.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resources`] | Walks the content directory into [`assets::AssetJob`]s |
//! | [`srcset`] | Pure planning: which variants are worth generating, at what size |
//! | [`transcode`] | `Transcoder` trait + ImageMagick implementation |
//! | [`assets`] | Per-image orchestration: originals, chained re-encoding, commit |
//! | [`driver`] | Parallel fan-out with first-error propagation |
//! | [`build_dir`] | Output-namespace gate: collision-checked destination paths |
//! | [`state`] | Write-once shared registry, frozen into `srcsets.json` |
//! | [`urls`] | Asset URL scheme and ImageId derivation |
//! | [`config`] | `photostatic.toml` loading |
//! | [`output`] | CLI progress formatting (event channel + printer thread) |
//! | [`types`] | Shared serialized types (`Size`, `ImageSrcSet`, IDs) |
//!
//! # Design Decisions
//!
//! ## External Transcoder, In-Process Probing
//!
//! Re-encoding shells out to ImageMagick rather than resizing in-process:
//! it is trusted to carry image metadata through correctly, and the chained
//! re-encode strategy makes process-spawn overhead irrelevant next to the
//! pixel work. Dimension probing stays in-process via the `image` crate's
//! header-only decode, so planning never pays for a full decode or a
//! subprocess.
//!
//! ## JPEG-Only Output
//!
//! Every generated variant is a JPEG. Photo sources are JPEGs already, and a
//! single output format keeps the URL scheme and the transcoder contract
//! trivial; any other requested output extension is a configuration error
//! caught before the transcoder runs.
//!
//! ## Collisions Are Fatal
//!
//! Two images resolving to the same output path, or the same ImageId,
//! always indicate an upstream ID-derivation bug. Both the filesystem gate
//! ([`build_dir::BuildDirectory::prepare_file`]) and the registry
//! ([`state::BuildState::commit`]) fail loudly instead of overwriting.

pub mod assets;
pub mod build_dir;
pub mod config;
pub mod driver;
pub mod output;
pub mod resources;
pub mod srcset;
pub mod state;
pub mod transcode;
pub mod types;
pub mod urls;
