//! Serve-mode session: bulk merge, then reconcile every change as it lands

use std::path::PathBuf;

use overlay_core::{ChangeEvent, ChangeReconciler, MergeLayout, Outcome};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::Result;
use crate::router::EventRouter;
use crate::watcher::{LayerWatcher, RawEvent};

/// Running tally of what a session did with its events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServeStats {
    /// Path-scoped events handed to the reconciler
    pub events: usize,
    pub copied: usize,
    pub removed: usize,
    pub shadowed: usize,
    /// Events that found nothing to do (already absent, protected)
    pub unchanged: usize,
    /// Events whose reconciliation failed
    pub failed: usize,
    /// Watcher errors received instead of events
    pub watch_errors: usize,
}

impl ServeStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Copied { .. } => self.copied += 1,
            Outcome::Removed => self.removed += 1,
            Outcome::Shadowed { .. } => self.shadowed += 1,
            Outcome::AlreadyAbsent | Outcome::Protected => self.unchanged += 1,
        }
    }
}

/// Routes notifications to the reconciler, one event at a time.
#[derive(Debug, Clone)]
pub struct LiveSession {
    router: EventRouter,
    reconciler: ChangeReconciler,
}

impl LiveSession {
    pub fn new(layout: &MergeLayout) -> Self {
        Self {
            router: EventRouter::new(layout.layers().clone(), layout.output()),
            reconciler: layout.reconciler(),
        }
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn reconciler(&self) -> &ChangeReconciler {
        &self.reconciler
    }

    /// Layer roots to watch, highest priority first.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.router
            .layers()
            .iter()
            .map(|l| l.root().to_path_buf())
            .collect()
    }

    /// Apply one path-scoped event. A failure is logged and counted, never
    /// propagated, so later events still get handled.
    pub fn apply(&self, event: &ChangeEvent, stats: &mut ServeStats) {
        stats.events += 1;
        match self.reconciler.apply(event) {
            Ok(outcome) => {
                debug!(path = %event.path, ?outcome, "Applied change");
                stats.record(outcome);
            }
            Err(e) => {
                warn!(
                    path = %event.path,
                    layer = event.layer,
                    kind = ?event.kind,
                    error = %e,
                    "Failed to reconcile change"
                );
                stats.failed += 1;
            }
        }
    }

    /// Translate and apply one raw notification.
    pub fn handle(&self, event: &notify::Event, stats: &mut ServeStats) {
        for change in self.router.translate(event) {
            self.apply(&change, stats);
        }
    }

    /// Drain `events` in order until the source ends.
    pub fn run<I>(&self, events: I) -> ServeStats
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let mut stats = ServeStats::default();
        for raw in events {
            match raw {
                Ok(event) => self.handle(&event, &mut stats),
                Err(e) => {
                    warn!(error = %e, "Watcher error");
                    stats.watch_errors += 1;
                }
            }
        }
        info!(
            events = stats.events,
            copied = stats.copied,
            removed = stats.removed,
            failed = stats.failed,
            "Watch stopped"
        );
        stats
    }
}

/// Merge `layout` in full, then keep it reconciled until the watcher stops.
///
/// Only setup failures are returned. Once watching, per-event failures are
/// logged and the session carries on.
pub fn serve(layout: &MergeLayout) -> Result<ServeStats> {
    let report = layout.merge()?;
    info!(
        files = report.files_copied,
        output = %layout.output().display(),
        "Initial merge complete"
    );

    let session = LiveSession::new(layout);
    let watcher = LayerWatcher::new(&session.roots())?;
    Ok(session.run(std::iter::from_fn(|| watcher.recv())))
}
