//! Incremental reconciliation of the output tree
//!
//! Each change event is handled in two phases. First the current winner for
//! the event's path is resolved against live disk state. Then [`plan`] maps
//! the event and winner to a single [`Effect`], which is applied to the
//! output.
//!
//! The reconciler holds no state between events. Duplicate, late, or
//! reordered events all re-resolve from disk and converge on the same
//! output.

use std::path::{Path, PathBuf};

use overlay_fs::{RelativePath, io};
use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::layers::{LayerSet, Winner};

/// What happened to a file in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Modify,
    Remove,
}

/// A single path-scoped change in one layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    /// Index of the layer the change happened in
    pub layer: usize,
    pub path: RelativePath,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, layer: usize, path: RelativePath) -> Self {
        Self { kind, layer, path }
    }

    pub fn add(layer: usize, path: RelativePath) -> Self {
        Self::new(ChangeKind::Add, layer, path)
    }

    pub fn modify(layer: usize, path: RelativePath) -> Self {
        Self::new(ChangeKind::Modify, layer, path)
    }

    pub fn remove(layer: usize, path: RelativePath) -> Self {
        Self::new(ChangeKind::Remove, layer, path)
    }
}

/// The single output mutation an event calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// A higher-priority layer still supplies the path; leave the output alone.
    Shadowed { by: usize },
    /// Copy the path from this layer into the output.
    Copy { from: usize },
    /// No layer supplies the path any more; delete it from the output.
    Remove,
}

/// Decide the effect of `event` given the path's current winner.
///
/// A winner above the event's layer shadows the change, whatever its kind.
/// A winner at or below it is copied: for Add and Modify that is normally
/// the event's own layer, for Remove it is the next surviving layer taking
/// over. With no winner left, the output file goes.
pub fn plan(event: &ChangeEvent, winner: Winner) -> Effect {
    match winner {
        Winner::Layer(k) if k < event.layer => Effect::Shadowed { by: k },
        Winner::Layer(k) => Effect::Copy { from: k },
        Winner::None => Effect::Remove,
    }
}

/// What applying an event did to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Outcome {
    Copied { from: usize },
    Removed,
    AlreadyAbsent,
    Shadowed { by: usize },
    Protected,
}

/// Keeps an output tree consistent with its layers, one event at a time.
///
/// Calls for the same output must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct ChangeReconciler {
    layers: LayerSet,
    output: PathBuf,
    protected: Vec<RelativePath>,
}

impl ChangeReconciler {
    pub fn new(layers: LayerSet, output: impl Into<PathBuf>) -> Self {
        Self {
            layers,
            output: output.into(),
            protected: Vec::new(),
        }
    }

    /// Paths in the output that events must never touch.
    pub fn with_protected(mut self, paths: impl IntoIterator<Item = RelativePath>) -> Self {
        self.protected.extend(paths);
        self
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn protected(&self) -> &[RelativePath] {
        &self.protected
    }

    /// Apply one change event to the output.
    ///
    /// Performs at most one file write or one file delete. A failure leaves
    /// the reconciler usable for later events.
    pub fn apply(&self, event: &ChangeEvent) -> Result<Outcome> {
        self.layers.layer(event.layer)?;

        if self.protected.iter().any(|p| event.path.starts_with(p)) {
            debug!(path = %event.path, "Ignoring event on protected path");
            return Ok(Outcome::Protected);
        }

        let winner = self.layers.resolve(&event.path);
        let effect = plan(event, winner);
        debug!(
            path = %event.path,
            kind = ?event.kind,
            layer = event.layer,
            winner = ?winner,
            effect = ?effect,
            "Reconciling"
        );

        let target = event.path.under(&self.output);
        match effect {
            Effect::Shadowed { by } => Ok(Outcome::Shadowed { by }),
            Effect::Copy { from } => {
                let source = self.layers.layer(from)?.file(&event.path);
                io::copy_file(&source, &target)?;
                Ok(Outcome::Copied { from })
            }
            Effect::Remove => {
                if io::remove_file(&target)? {
                    Ok(Outcome::Removed)
                } else {
                    Ok(Outcome::AlreadyAbsent)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(s: &str) -> RelativePath {
        RelativePath::new(s).unwrap()
    }

    #[test]
    fn plan_shadows_changes_below_the_winner() {
        for kind in [ChangeKind::Add, ChangeKind::Modify, ChangeKind::Remove] {
            let event = ChangeEvent::new(kind, 2, rel("a"));
            assert_eq!(plan(&event, Winner::Layer(0)), Effect::Shadowed { by: 0 });
        }
    }

    #[test]
    fn plan_copies_from_the_changed_layer_when_it_wins() {
        let event = ChangeEvent::modify(1, rel("a"));
        assert_eq!(plan(&event, Winner::Layer(1)), Effect::Copy { from: 1 });
    }

    #[test]
    fn plan_falls_through_on_remove() {
        let event = ChangeEvent::remove(0, rel("a"));
        assert_eq!(plan(&event, Winner::Layer(3)), Effect::Copy { from: 3 });
    }

    #[test]
    fn plan_removes_when_nothing_wins() {
        assert_eq!(
            plan(&ChangeEvent::remove(0, rel("a")), Winner::None),
            Effect::Remove
        );
        // Add whose file vanished before it was handled
        assert_eq!(
            plan(&ChangeEvent::add(1, rel("a")), Winner::None),
            Effect::Remove
        );
    }

    #[test]
    fn outcomes_serialize_with_a_tag() {
        assert_eq!(
            serde_json::to_value(Outcome::Copied { from: 2 }).unwrap(),
            serde_json::json!({ "outcome": "copied", "from": 2 })
        );
        assert_eq!(
            serde_json::to_value(Outcome::AlreadyAbsent).unwrap(),
            serde_json::json!({ "outcome": "already_absent" })
        );
    }
}
