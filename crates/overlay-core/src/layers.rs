//! Ordered layer roots and winner resolution
//!
//! Index order is priority order: layer 0 beats every other layer. A layer
//! holds a path when the joined path is a regular file (symlinks followed);
//! directories never win.
//!
//! Resolution always consults the disk. There is no cached index, so a
//! missed or replayed event is corrected the next time its path resolves.

use std::path::{Path, PathBuf};

use overlay_fs::RelativePath;

use crate::{Error, Result};

/// The layer supplying a path's content in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    /// The highest-priority layer that currently holds the path.
    Layer(usize),
    /// No layer holds the path; it must be absent from the output.
    None,
}

impl Winner {
    pub fn index(self) -> Option<usize> {
        match self {
            Winner::Layer(i) => Some(i),
            Winner::None => None,
        }
    }
}

/// One source directory tree taking part in the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    root: PathBuf,
}

impl Layer {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Create a layer named after the last component of its root.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { name, root }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Native location of `path` inside this layer.
    pub fn file(&self, path: &RelativePath) -> PathBuf {
        path.under(&self.root)
    }

    /// Whether this layer currently holds `path` as a file.
    pub fn holds(&self, path: &RelativePath) -> bool {
        self.file(path).is_file()
    }
}

/// Layers in priority order, fixed for the lifetime of a merge session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    /// Build a layer set, highest priority first.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyLayerSet);
        }
        Ok(Self { layers })
    }

    /// Build a layer set from bare roots, naming each after its directory.
    pub fn from_roots<I, P>(roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(roots.into_iter().map(Layer::from_root).collect())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Layer at `index`, or `UnknownLayer` if out of range.
    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or(Error::UnknownLayer {
            index,
            count: self.layers.len(),
        })
    }

    /// Iterate layers, highest priority first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> + ExactSizeIterator {
        self.layers.iter()
    }

    /// Whether layer `index` currently holds `path`.
    pub fn contains(&self, index: usize, path: &RelativePath) -> bool {
        self.layers.get(index).is_some_and(|l| l.holds(path))
    }

    /// Determine which layer supplies `path` right now.
    pub fn resolve(&self, path: &RelativePath) -> Winner {
        self.layers
            .iter()
            .position(|l| l.holds(path))
            .map_or(Winner::None, Winner::Layer)
    }

    /// Every layer index holding `path`, highest priority first.
    pub fn holders(&self, path: &RelativePath) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.holds(path))
            .map(|(i, _)| i)
            .collect()
    }

    /// Fail with `MissingLayerRoot` for the first layer whose root is not a directory.
    pub fn verify_roots(&self) -> Result<()> {
        for (index, layer) in self.layers.iter().enumerate() {
            ensure_root(index, layer)?;
        }
        Ok(())
    }
}

pub(crate) fn ensure_root(index: usize, layer: &Layer) -> Result<()> {
    if layer.root.is_dir() {
        Ok(())
    } else {
        Err(Error::MissingLayerRoot {
            index,
            name: layer.name.clone(),
            path: layer.root.clone(),
        })
    }
}
