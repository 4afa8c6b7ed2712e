//! Routing of absolute filesystem paths to layer-scoped change events
//!
//! A changed path belongs to the layer whose root prefixes it. Paths under
//! no layer root, and anything inside the output itself, are dropped here
//! and never reach the reconciler.

use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};
use overlay_core::{ChangeEvent, ChangeKind, LayerSet};
use overlay_fs::RelativePath;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Maps raw notifications onto `(kind, layer, relative path)` events.
#[derive(Debug, Clone)]
pub struct EventRouter {
    layers: LayerSet,
    /// Layer roots as configured and in canonical form, by layer index
    roots: Vec<(PathBuf, PathBuf)>,
    output: PathBuf,
    canonical_output: PathBuf,
}

impl EventRouter {
    pub fn new(layers: LayerSet, output: impl Into<PathBuf>) -> Self {
        let roots = layers
            .iter()
            .map(|l| (l.root().to_path_buf(), canonical(l.root())))
            .collect();
        let output = output.into();
        let canonical_output = canonical(&output);
        Self {
            layers,
            roots,
            output,
            canonical_output,
        }
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// Find the layer holding `path` and its key within that layer.
    ///
    /// The deepest matching root wins when roots nest.
    pub fn locate(&self, path: &Path) -> Option<(usize, RelativePath)> {
        if path.starts_with(&self.output) || path.starts_with(&self.canonical_output) {
            return None;
        }

        self.roots
            .iter()
            .enumerate()
            .filter_map(|(index, (raw, canon))| {
                let (root, rel) = [raw, canon]
                    .into_iter()
                    .find_map(|root| RelativePath::strip_root(path, root).map(|rel| (root, rel)))?;
                Some((root.components().count(), index, rel))
            })
            .max_by_key(|(depth, index, _)| (*depth, std::cmp::Reverse(*index)))
            .map(|(_, index, rel)| (index, rel))
    }

    /// Build an event for `path`, or `None` if it lies under no layer.
    pub fn route(&self, kind: ChangeKind, path: &Path) -> Option<ChangeEvent> {
        match self.locate(path) {
            Some((layer, rel)) => Some(ChangeEvent::new(kind, layer, rel)),
            None => {
                debug!(path = %path.display(), "Dropping event outside every layer");
                None
            }
        }
    }

    /// Translate one raw notification into zero or more events.
    pub fn translate(&self, event: &notify::Event) -> Vec<ChangeEvent> {
        let routed = |kind, path: &PathBuf| self.route(kind, path);

        let events: Vec<ChangeEvent> = match event.kind {
            EventKind::Create(_) => event
                .paths
                .iter()
                .filter_map(|p| routed(ChangeKind::Add, p))
                .collect(),
            EventKind::Remove(_) => event
                .paths
                .iter()
                .filter_map(|p| routed(ChangeKind::Remove, p))
                .collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => event
                .paths
                .iter()
                .filter_map(|p| routed(ChangeKind::Remove, p))
                .collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event
                .paths
                .iter()
                .filter_map(|p| routed(ChangeKind::Add, p))
                .collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let mut out = Vec::new();
                if let Some(from) = event.paths.first() {
                    out.extend(routed(ChangeKind::Remove, from));
                }
                if let Some(to) = event.paths.get(1) {
                    out.extend(routed(ChangeKind::Add, to));
                }
                out
            }
            // Rename with no side given: the disk decides
            EventKind::Modify(ModifyKind::Name(_)) => event
                .paths
                .iter()
                .filter_map(|p| {
                    let kind = if p.exists() {
                        ChangeKind::Add
                    } else {
                        ChangeKind::Remove
                    };
                    routed(kind, p)
                })
                .collect(),
            EventKind::Modify(_) => event
                .paths
                .iter()
                .filter_map(|p| routed(ChangeKind::Modify, p))
                .collect(),
            _ => Vec::new(),
        };

        events.into_iter().flat_map(|e| self.expand(e)).collect()
    }

    /// Split an event on a directory into one event per file beneath it.
    ///
    /// Adds walk the layer's directory; removes walk the output, since the
    /// layer's copy is already gone.
    pub fn expand(&self, event: ChangeEvent) -> Vec<ChangeEvent> {
        let dir = match event.kind {
            ChangeKind::Add | ChangeKind::Modify => match self.layers.get(event.layer) {
                Some(layer) => layer.file(&event.path),
                None => return vec![event],
            },
            ChangeKind::Remove => event.path.under(&self.output),
        };

        if !dir.is_dir() {
            return vec![event];
        }

        let kind = match event.kind {
            ChangeKind::Remove => ChangeKind::Remove,
            _ => ChangeKind::Add,
        };

        let mut expanded = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Failed to expand directory event");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = RelativePath::strip_root(entry.path(), &dir) else {
                continue;
            };
            if let Ok(path) = event.path.join(rel.as_str()) {
                expanded.push(ChangeEvent::new(kind, event.layer, path));
            }
        }
        debug!(path = %event.path, files = expanded.len(), "Expanded directory event");
        expanded
    }
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
