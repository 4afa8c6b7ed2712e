//! Project configuration
//!
//! Layers are sibling directories under one public directory, listed
//! highest priority first:
//!
//! ```toml
//! [merge]
//! public_dir = "public"
//! dist_dir = "dist"
//! merge_dir = "mp"
//! layers = ["brand", "base"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use overlay_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layers::{Layer, LayerSet};
use crate::layout::MergeLayout;
use crate::merge::lexical;
use crate::mode::Mode;
use crate::{Error, Result};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "overlay.toml";

/// Top-level project configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub merge: MergeConfig,
}

/// The `[merge]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    /// Parent directory of every layer, relative to the project root
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Parent directory of the build output, relative to the project root
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    /// Name of the merged directory in both modes
    #[serde(default = "default_merge_dir")]
    pub merge_dir: String,

    /// Layer directory names, highest priority first
    pub layers: Vec<String>,
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_merge_dir() -> String {
    "mp".to_string()
}

impl MergeConfig {
    /// A config with default directories and the given layers.
    pub fn with_layers<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            public_dir: default_public_dir(),
            dist_dir: default_dist_dir(),
            merge_dir: default_merge_dir(),
            layers: layers.into_iter().map(Into::into).collect(),
        }
    }
}

impl ProjectConfig {
    pub fn new(merge: MergeConfig) -> Self {
        Self { merge }
    }

    /// Load and validate a config file. The format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        debug!(path = %path.display(), layers = ?config.merge.layers, "Loaded config");
        Ok(config)
    }

    /// Write this config to `path`. The format follows the extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    /// Reject configs that cannot produce a sound merge.
    pub fn validate(&self) -> Result<()> {
        let merge = &self.merge;
        if merge.layers.is_empty() {
            return Err(Error::invalid_config("`layers` must list at least one layer"));
        }
        if !is_single_segment(&merge.merge_dir) {
            return Err(Error::invalid_config(format!(
                "`merge_dir` must be a single directory name, got '{}'",
                merge.merge_dir
            )));
        }

        let mut seen = HashSet::new();
        for name in &merge.layers {
            if !is_single_segment(name) {
                return Err(Error::invalid_config(format!(
                    "layer '{name}' must be a single directory name"
                )));
            }
            if *name == merge.merge_dir {
                return Err(Error::invalid_config(format!(
                    "layer '{name}' collides with `merge_dir`"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::invalid_config(format!("layer '{name}' listed twice")));
            }
        }

        // Both sides are relative to the same root, or both absolute
        let build_output = lexical(&merge.dist_dir.join(&merge.merge_dir));
        let public = lexical(&merge.public_dir);
        if public.starts_with(&build_output) {
            return Err(Error::invalid_config(format!(
                "build output '{}' would replace public_dir '{}'",
                build_output.display(),
                public.display()
            )));
        }
        if let Some(name) = merge
            .layers
            .iter()
            .find(|name| build_output.starts_with(public.join(name)))
        {
            return Err(Error::invalid_config(format!(
                "build output '{}' lies inside layer '{name}'",
                build_output.display()
            )));
        }
        Ok(())
    }

    /// Resolve every directory against `root` for the given mode.
    pub fn layout(&self, root: &Path, mode: Mode) -> Result<MergeLayout> {
        self.validate()?;
        let merge = &self.merge;
        let public = root.join(&merge.public_dir);

        let layers = LayerSet::new(
            merge
                .layers
                .iter()
                .map(|name| Layer::new(name.clone(), public.join(name)))
                .collect(),
        )?;

        let output = match mode {
            Mode::Build => root.join(&merge.dist_dir).join(&merge.merge_dir),
            Mode::Serve => public.join(&merge.merge_dir),
        };

        Ok(MergeLayout::new(mode, layers, output))
    }
}

fn is_single_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}
