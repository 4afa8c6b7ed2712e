//! Drift detection between layers and a merged output
//!
//! Recomputes the expected winner of every path across all layers and
//! compares it with what the output actually holds.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use overlay_fs::{RelativePath, checksum};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layers::{LayerSet, ensure_root};
use crate::merge::files_under;
use crate::Result;

/// Status of the drift check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Output matches the layers exactly
    Healthy,
    /// Some winning files are absent from the output
    Missing,
    /// Some output files differ from their winner or have no winner at all
    Drifted,
}

/// A single path that does not match the layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// Relative path affected
    pub path: String,
    /// Name of the layer that should supply it, if any
    pub layer: Option<String>,
    /// Human-readable description of the drift
    pub description: String,
}

/// Report from a drift check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Overall status of the check
    pub status: CheckStatus,
    /// Output files whose content differs from the winning layer
    pub drifted: Vec<DriftItem>,
    /// Winning files absent from the output
    pub missing: Vec<DriftItem>,
    /// Output files no layer supplies
    pub extra: Vec<DriftItem>,
    /// Number of distinct paths compared
    pub checked: usize,
}

impl CheckReport {
    fn from_items(
        drifted: Vec<DriftItem>,
        missing: Vec<DriftItem>,
        extra: Vec<DriftItem>,
        checked: usize,
    ) -> Self {
        let status = if !drifted.is_empty() || !extra.is_empty() {
            CheckStatus::Drifted
        } else if !missing.is_empty() {
            CheckStatus::Missing
        } else {
            CheckStatus::Healthy
        };
        Self {
            status,
            drifted,
            missing,
            extra,
            checked,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}

/// Check `output` against the priority and absence rules.
///
/// Paths in `protected` (and anything beneath them) belong to the session,
/// not to any layer, and are skipped on both sides.
pub fn verify(layers: &LayerSet, output: &Path, protected: &[RelativePath]) -> Result<CheckReport> {
    let is_protected = |rel: &RelativePath| protected.iter().any(|p| rel.starts_with(p));

    // Highest priority first, so the first insert for a key is its winner
    let mut expected: BTreeMap<RelativePath, usize> = BTreeMap::new();
    for (index, layer) in layers.iter().enumerate() {
        ensure_root(index, layer)?;
        for (rel, _) in files_under(layer.root())? {
            if !is_protected(&rel) {
                expected.entry(rel).or_insert(index);
            }
        }
    }

    let actual: BTreeSet<RelativePath> = if output.is_dir() {
        files_under(output)?
            .into_iter()
            .map(|(rel, _)| rel)
            .filter(|rel| !is_protected(rel))
            .collect()
    } else {
        BTreeSet::new()
    };

    let mut drifted = Vec::new();
    let mut missing = Vec::new();
    let mut extra = Vec::new();

    for (rel, &index) in &expected {
        let layer = layers.layer(index)?;
        let item = |description: String| DriftItem {
            path: rel.to_string(),
            layer: Some(layer.name().to_string()),
            description,
        };

        if !actual.contains(rel) {
            missing.push(item(format!("expected from layer '{}'", layer.name())));
            continue;
        }

        let want = checksum::compute_file_checksum(&layer.file(rel))
            .map_err(|e| overlay_fs::Error::io(layer.file(rel), e))?;
        let output_file = rel.under(output);
        let have = checksum::compute_file_checksum(&output_file)
            .map_err(|e| overlay_fs::Error::io(&output_file, e))?;
        if want != have {
            drifted.push(item(format!(
                "content differs from layer '{}' ({} != {})",
                layer.name(),
                have,
                want
            )));
        }
    }

    for rel in actual.iter().filter(|rel| !expected.contains_key(*rel)) {
        extra.push(DriftItem {
            path: rel.to_string(),
            layer: None,
            description: "not present in any layer".to_string(),
        });
    }

    let checked = expected.len() + extra.len();
    debug!(
        checked,
        drifted = drifted.len(),
        missing = missing.len(),
        extra = extra.len(),
        "Drift check complete"
    );
    Ok(CheckReport::from_items(drifted, missing, extra, checked))
}
