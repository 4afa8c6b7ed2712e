//! Recursive watch over every layer root

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::info;

use crate::{Error, Result};

/// Raw notification as delivered by the platform watcher.
pub type RawEvent = notify::Result<notify::Event>;

/// Holds the platform watcher alive and exposes its notifications as a
/// channel, drained by a single consumer.
pub struct LayerWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<RawEvent>,
    roots: Vec<PathBuf>,
}

impl LayerWatcher {
    /// Start watching every root recursively.
    pub fn new(roots: &[PathBuf]) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        for root in roots {
            if !root.is_dir() {
                return Err(Error::MissingRoot { path: root.clone() });
            }
        }

        let mut watcher = notify::recommended_watcher(move |res: RawEvent| {
            // Receiver gone means the session is shutting down
            let _ = tx.send(res);
        })
        .map_err(Error::Init)?;

        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|source| Error::Watch {
                    path: root.clone(),
                    source,
                })?;
            info!(root = %root.display(), "Watching layer");
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            roots: roots.to_vec(),
        })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Block until the next notification. `None` once the watcher stops.
    pub fn recv(&self) -> Option<RawEvent> {
        self.rx.recv().ok()
    }

    /// Wait up to `timeout` for the next notification.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RawEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl std::fmt::Debug for LayerWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerWatcher")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_root_is_rejected_up_front() {
        let temp = TempDir::new().unwrap();
        let result = LayerWatcher::new(&[temp.path().join("absent")]);
        assert!(matches!(result, Err(Error::MissingRoot { .. })));
    }

    #[test]
    fn watches_existing_roots() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();

        let watcher = LayerWatcher::new(&[a.clone(), b]).unwrap();

        assert_eq!(watcher.roots().len(), 2);
        assert_eq!(watcher.roots()[0], a);
    }

    #[test]
    fn reports_file_creation() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("layer");
        std::fs::create_dir_all(&root).unwrap();
        let watcher = LayerWatcher::new(std::slice::from_ref(&root)).unwrap();

        std::fs::write(root.join("new.txt"), "x").unwrap();

        // Platform watchers may coalesce or delay; accept any event naming the file
        let mut seen = false;
        while let Some(Ok(event)) = watcher.recv_timeout(Duration::from_secs(5)) {
            if event.paths.iter().any(|p| p.ends_with("new.txt")) {
                seen = true;
                break;
            }
        }
        assert!(seen, "no event for new.txt");
    }
}
