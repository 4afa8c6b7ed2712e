//! [`TestLayers`] builder for merge and reconciliation scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project with a `public/` directory holding one subdirectory
/// per layer, highest priority first.
///
/// # Example
///
/// ```rust,no_run
/// use overlay_test_utils::TestLayers;
///
/// let project = TestLayers::new(&["high", "low"]);
/// project.write("high", "a.txt", "1");
/// project.write("low", "a.txt", "2");
/// assert_eq!(project.layer_roots().len(), 2);
/// ```
pub struct TestLayers {
    temp_dir: TempDir,
    names: Vec<String>,
}

impl TestLayers {
    /// Create a project whose layer directories all exist and are empty.
    pub fn new(names: &[&str]) -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
            names: names.iter().map(|n| n.to_string()).collect(),
        };
        for name in names {
            fs::create_dir_all(project.layer_root(name)).unwrap_or_else(|e| {
                panic!("TestLayers::new: failed to create layer {name}: {e}")
            });
        }
        project
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Parent of every layer directory.
    pub fn public(&self) -> PathBuf {
        self.root().join("public")
    }

    pub fn layer_root(&self, name: &str) -> PathBuf {
        self.public().join(name)
    }

    /// Layer roots, highest priority first.
    pub fn layer_roots(&self) -> Vec<PathBuf> {
        self.names.iter().map(|n| self.layer_root(n)).collect()
    }

    /// Priority index of a layer.
    ///
    /// # Panics
    /// Panics if the layer was not declared.
    pub fn index_of(&self, name: &str) -> usize {
        self.names
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("TestLayers: unknown layer {name}"))
    }

    /// Default output directory used by scenarios that need just one.
    pub fn output(&self) -> PathBuf {
        self.root().join("out")
    }

    /// Write `content` to `path` inside `layer`, creating parents.
    pub fn write(&self, layer: &str, path: &str, content: &str) {
        let full = self.layer_root(layer).join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content)
            .unwrap_or_else(|e| panic!("TestLayers::write: {}: {e}", full.display()));
    }

    /// Delete `path` from `layer`.
    pub fn remove(&self, layer: &str, path: &str) {
        let full = self.layer_root(layer).join(path);
        fs::remove_file(&full)
            .unwrap_or_else(|e| panic!("TestLayers::remove: {}: {e}", full.display()));
    }

    /// Write an `overlay.toml` declaring the layers in order.
    pub fn write_config(&self) -> PathBuf {
        let layers = self
            .names
            .iter()
            .map(|n| format!("\"{n}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let path = self.root().join("overlay.toml");
        fs::write(&path, format!("[merge]\nlayers = [{layers}]\n")).unwrap();
        path
    }

    /// Assert that `path` in `dir` holds exactly `content`.
    ///
    /// # Panics
    /// Panics with a descriptive message on mismatch or missing file.
    pub fn assert_file(&self, dir: &Path, path: &str, content: &str) {
        let full = dir.join(path);
        let actual = fs::read_to_string(&full)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full.display()));
        assert_eq!(
            actual,
            content,
            "File {} has unexpected content",
            full.display()
        );
    }

    /// Assert that `path` does **not** exist in `dir`.
    pub fn assert_absent(&self, dir: &Path, path: &str) {
        let full = dir.join(path);
        assert!(!full.exists(), "Expected file NOT to exist: {}", full.display());
    }

    /// Every file under `dir`, keyed by slash-separated relative path.
    pub fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut out = BTreeMap::new();
        collect(dir, dir, &mut out);
        out
    }
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.insert(rel, fs::read(&path).unwrap());
        }
    }
}
