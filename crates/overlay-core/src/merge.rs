//! Full wipe-and-recopy of the output tree
//!
//! Layers are copied lowest priority first, so when two layers share a path
//! the higher-priority copy lands last and wins. Shadowed files get written
//! and then overwritten; this only runs once per session.

use std::fs;
use std::path::{Component, Path, PathBuf};

use overlay_fs::{RelativePath, io};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::layers::{LayerSet, ensure_root};
use crate::{Error, Result};

/// Counts from a bulk merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Number of layers copied
    pub layers: usize,
    /// Number of file copies performed, shadowed ones included
    pub files_copied: usize,
    /// Number of copies that replaced a lower-priority file
    pub files_overwritten: usize,
}

/// Rebuild `output` from scratch out of every layer.
///
/// Fails with `MissingLayerRoot` at the first layer whose root is absent.
/// Layers already copied at that point are left in place.
pub fn merge(layers: &LayerSet, output: &Path) -> Result<MergeReport> {
    ensure_disjoint(layers, output)?;

    info!(output = %output.display(), layers = layers.len(), "Merging layers");
    io::reset_dir(output)?;

    let mut report = MergeReport::default();
    for (index, layer) in layers.iter().enumerate().rev() {
        ensure_root(index, layer)?;
        debug!(layer = index, name = layer.name(), "Copying layer");

        for entry in WalkDir::new(layer.root())
            .follow_links(true)
            .sort_by_file_name()
            .min_depth(1)
        {
            let entry = entry?;
            let Some(rel) = RelativePath::strip_root(entry.path(), layer.root()) else {
                continue;
            };
            let dest = rel.under(output);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest).map_err(|e| overlay_fs::Error::io(&dest, e))?;
                continue;
            }

            if dest.is_file() {
                report.files_overwritten += 1;
            }
            io::copy_file(entry.path(), &dest)?;
            report.files_copied += 1;
        }
        report.layers += 1;
    }

    info!(
        files = report.files_copied,
        overwritten = report.files_overwritten,
        "Merge complete"
    );
    Ok(report)
}

/// Fail unless `output` and every layer root are disjoint trees.
///
/// Compared in resolved form, so `.`/`..` segments, relative paths and
/// symlinked ancestors all count.
pub(crate) fn ensure_disjoint(layers: &LayerSet, output: &Path) -> Result<()> {
    let target = resolved(output);
    for layer in layers.iter() {
        let root = resolved(layer.root());
        if target.starts_with(&root) {
            return Err(Error::OutputInsideLayer {
                output: output.to_path_buf(),
                layer: layer.root().to_path_buf(),
            });
        }
        if root.starts_with(&target) {
            return Err(Error::OutputContainsLayer {
                output: output.to_path_buf(),
                layer: layer.root().to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Canonical form of `path`, which need not exist yet.
///
/// The deepest existing ancestor is canonicalised and the missing tail
/// appended to it.
fn resolved(path: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(path) {
        return canonical;
    }
    let path = &lexical(path);
    let mut existing = path.as_path();
    let mut tail = Vec::new();
    loop {
        let probe = if existing.as_os_str().is_empty() {
            Path::new(".")
        } else {
            existing
        };
        if let Ok(mut canonical) = dunce::canonicalize(probe) {
            canonical.extend(tail.iter().rev());
            return canonical;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.clone(),
        }
    }
}

/// Drop `.` segments and fold `..` into its parent without touching disk.
pub(crate) fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Every file under `root` with its relative key, sorted by key.
pub(crate) fn files_under(root: &Path) -> Result<Vec<(RelativePath, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .min_depth(1)
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(rel) = RelativePath::strip_root(entry.path(), root) {
            files.push((rel, entry.into_path()));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
