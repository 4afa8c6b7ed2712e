//! Error types for overlay-core

use std::path::PathBuf;

/// Result type for overlay-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in overlay-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared layer directory does not exist
    #[error("Layer {index} ('{name}') not found at {path}")]
    MissingLayerRoot {
        index: usize,
        name: String,
        path: PathBuf,
    },

    /// A layer set must hold at least one layer
    #[error("No layers configured")]
    EmptyLayerSet,

    /// An event referenced a layer index outside the configured set
    #[error("Unknown layer index {index} (have {count} layers)")]
    UnknownLayer { index: usize, count: usize },

    /// The output root lies inside a layer, which would merge it into itself
    #[error("Output {output} lies inside layer root {layer}")]
    OutputInsideLayer { output: PathBuf, layer: PathBuf },

    /// The output root is or encloses a layer root, so resetting it would
    /// delete layer sources
    #[error("Output {output} contains layer root {layer}")]
    OutputContainsLayer { output: PathBuf, layer: PathBuf },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parsed but is unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Invalid merge mode specified
    #[error("Invalid mode: {mode}")]
    InvalidMode { mode: String },

    /// Directory traversal failed
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Filesystem error from overlay-fs
    #[error(transparent)]
    Fs(#[from] overlay_fs::Error),
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
