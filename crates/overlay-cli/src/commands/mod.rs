//! Command implementations for overlay-cli

pub mod build;
pub mod check;
pub mod init;
pub mod layers;
pub mod serve;

use std::path::{Path, PathBuf};

use overlay_core::{MergeLayout, Mode, ProjectConfig};

use crate::error::Result;

pub use build::run_build;
pub use check::run_check;
pub use init::run_init;
pub use layers::run_layers;
pub use serve::run_serve;

/// Project root and config file location shared by every command.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: &Path) -> Self {
        let root = root.into();
        let config = root.join(config);
        Self { root, config }
    }

    pub fn load(&self) -> Result<ProjectConfig> {
        Ok(ProjectConfig::load(&self.config)?)
    }

    pub fn layout(&self, mode: Mode) -> Result<MergeLayout> {
        Ok(self.load()?.layout(&self.root, mode)?)
    }
}
