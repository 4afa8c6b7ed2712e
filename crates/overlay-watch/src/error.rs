//! Error types for overlay-watch

use std::path::PathBuf;

/// Result type for overlay-watch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running a watch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to initialize the watcher
    #[error("Failed to initialize watcher: {0}")]
    Init(#[source] notify::Error),

    /// Failed to watch a path
    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// A layer root to watch does not exist
    #[error("Cannot watch missing layer root {path}")]
    MissingRoot { path: PathBuf },

    /// Merge or reconcile error from overlay-core
    #[error(transparent)]
    Core(#[from] overlay_core::Error),
}
