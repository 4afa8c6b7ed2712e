//! Filesystem primitives for the overlay merger
//!
//! Provides the relative-path join key shared by layers and output, the
//! scoped copy/remove operations used to mutate the output tree, and
//! format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::RelativePath;
