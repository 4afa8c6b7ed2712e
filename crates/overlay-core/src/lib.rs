//! Layered overlay merge
//!
//! Merges an ordered list of directory trees ("layers") into one output
//! directory. For every relative path, the output holds the file from the
//! highest-priority layer that has it, or nothing if no layer does.
//!
//! - **Resolution**: [`LayerSet::resolve`] names the winning layer for a path
//! - **Bulk merge**: [`merge`] wipes the output and recopies every layer
//! - **Reconciliation**: [`ChangeReconciler::apply`] updates the output after
//!   a single file changes in a single layer, falling through to lower layers
//!   when a winning file is removed
//! - **Drift check**: [`verify`] compares an output against its layers
//!
//! # Architecture
//!
//! ```text
//!         overlay-cli
//!          |       |
//!          |  overlay-watch
//!          |       |
//!         overlay-core
//!              |
//!         overlay-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use overlay_core::{ChangeEvent, LayerSet, Outcome, Result, merge};
//! use overlay_fs::RelativePath;
//! use std::path::Path;
//!
//! fn example() -> Result<()> {
//!     let layers = LayerSet::from_roots(["public/brand", "public/base"])?;
//!     merge(&layers, Path::new("dist/mp"))?;
//!
//!     let reconciler = overlay_core::ChangeReconciler::new(layers, "dist/mp");
//!     let event = ChangeEvent::remove(0, RelativePath::new("logo.svg")?);
//!     if let Outcome::Copied { from } = reconciler.apply(&event)? {
//!         println!("logo.svg now comes from layer {from}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod layers;
pub mod layout;
pub mod merge;
pub mod mode;
pub mod reconcile;

pub use check::{CheckReport, CheckStatus, DriftItem, verify};
pub use config::{CONFIG_FILE, MergeConfig, ProjectConfig};
pub use error::{Error, Result};
pub use layers::{Layer, LayerSet, Winner};
pub use layout::{IGNORE_MARKER, MergeLayout};
pub use merge::{MergeReport, merge};
pub use mode::Mode;
pub use reconcile::{ChangeEvent, ChangeKind, ChangeReconciler, Effect, Outcome, plan};
