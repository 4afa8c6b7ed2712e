//! Live reconciliation for the overlay merger
//!
//! Watches every layer root, turns raw filesystem notifications into
//! path-scoped [`ChangeEvent`](overlay_core::ChangeEvent)s, and feeds them one
//! at a time to the reconciler.

pub mod error;
pub mod router;
pub mod serve;
pub mod watcher;

pub use error::{Error, Result};
pub use router::EventRouter;
pub use serve::{LiveSession, ServeStats, serve};
pub use watcher::LayerWatcher;
