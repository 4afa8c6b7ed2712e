//! Relative path handling shared by every layer and the output root

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path relative to each layer root and to the output root.
///
/// Stored with forward slashes and without empty, `.` or `..` segments, so
/// the same file in two layers always produces equal keys. Converted to a
/// platform-native path only when joined onto a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl RelativePath {
    /// Parse and normalize a relative path.
    ///
    /// Backslashes are treated as separators. Fails for absolute paths,
    /// paths that climb out of the root with `..`, and paths that normalize
    /// to nothing.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = path.to_string_lossy().replace('\\', "/");

        if path.has_root() || raw.starts_with('/') {
            return Err(Error::invalid_path(raw, "path is absolute"));
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(Error::invalid_path(raw, "path escapes its root")),
                s if segments.is_empty() && s.ends_with(':') => {
                    return Err(Error::invalid_path(raw, "path has a drive prefix"));
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(Error::invalid_path(raw, "path is empty"));
        }

        Ok(Self {
            inner: segments.join("/"),
        })
    }

    /// Compute the path of `path` relative to `root`.
    ///
    /// Returns `None` when `path` is not strictly beneath `root`.
    pub fn strip_root(path: &Path, root: &Path) -> Option<Self> {
        let rest = path.strip_prefix(root).ok()?;
        Self::new(rest).ok()
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Join this path onto a root directory, producing a native path.
    pub fn under(&self, root: &Path) -> PathBuf {
        let mut out = root.to_path_buf();
        out.extend(self.inner.split('/'));
        out
    }

    /// Get the parent path, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        self.inner.rfind('/').map(|idx| Self {
            inner: self.inner[..idx].to_string(),
        })
    }

    /// Get the final segment.
    pub fn file_name(&self) -> &str {
        self.inner.rsplit('/').next().unwrap_or(&self.inner)
    }

    /// Join a further relative segment onto this path.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self> {
        let tail = Self::new(segment)?;
        Ok(Self {
            inner: format!("{}/{}", self.inner, tail.inner),
        })
    }

    /// Check whether `self` equals `other` or lies beneath it, segment-wise.
    pub fn starts_with(&self, other: &RelativePath) -> bool {
        self.inner == other.inner
            || (self.inner.starts_with(&other.inner)
                && self.inner.as_bytes().get(other.inner.len()) == Some(&b'/'))
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&Path> for RelativePath {
    type Error = Error;

    fn try_from(p: &Path) -> Result<Self> {
        Self::new(p)
    }
}
