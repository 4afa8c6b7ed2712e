//! A resolved merge session: layers, output root and mode together
//!
//! Entry points pick a [`Mode`] and get back everything needed to run the
//! bulk merge and, in serve mode, the live reconciler for the same output.

use std::path::{Path, PathBuf};

use overlay_fs::{RelativePath, io};
use tracing::info;

use crate::check::{CheckReport, verify};
use crate::layers::LayerSet;
use crate::merge::{MergeReport, merge};
use crate::mode::Mode;
use crate::reconcile::ChangeReconciler;
use crate::Result;

/// File written into a serve-mode output so version control skips it.
pub const IGNORE_MARKER: &str = ".gitignore";

const IGNORE_MARKER_CONTENT: &[u8] = b"*";

/// Layers and output for one mode.
#[derive(Debug, Clone)]
pub struct MergeLayout {
    mode: Mode,
    layers: LayerSet,
    output: PathBuf,
}

impl MergeLayout {
    pub fn new(mode: Mode, layers: LayerSet, output: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            layers,
            output: output.into(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The ignore marker's relative path, in modes that write one.
    pub fn marker(&self) -> Option<RelativePath> {
        if self.mode.writes_marker() {
            RelativePath::new(IGNORE_MARKER).ok()
        } else {
            None
        }
    }

    /// Output paths owned by the session rather than by any layer.
    pub fn protected(&self) -> Vec<RelativePath> {
        self.marker().into_iter().collect()
    }

    /// Rebuild the output from every layer, then write the marker if the
    /// mode calls for one.
    pub fn merge(&self) -> Result<MergeReport> {
        let report = merge(&self.layers, &self.output)?;
        if let Some(marker) = self.marker() {
            io::write_atomic(&marker.under(&self.output), IGNORE_MARKER_CONTENT)?;
        }
        info!(mode = %self.mode, output = %self.output.display(), "Output ready");
        Ok(report)
    }

    /// A reconciler for this output that leaves the marker alone.
    pub fn reconciler(&self) -> ChangeReconciler {
        ChangeReconciler::new(self.layers.clone(), self.output.clone())
            .with_protected(self.protected())
    }

    /// Check the output against the layers.
    pub fn check(&self) -> Result<CheckReport> {
        verify(&self.layers, &self.output, &self.protected())
    }
}
