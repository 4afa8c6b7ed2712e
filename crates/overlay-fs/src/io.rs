//! Scoped mutations of the output tree
//!
//! Every operation here is a single attempt. Callers decide whether a
//! failure is fatal.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::{Error, Result};

/// Copy a whole file, creating any missing ancestors of `to`.
///
/// Overwrites `to` if present. Returns the number of bytes copied.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::CopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })?;
    }

    fs::copy(from, to).map_err(|source| Error::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Delete a single file. Not recursive.
///
/// Returns `false` when there was nothing to delete.
pub fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::DeleteFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace `path` with an empty directory.
///
/// Removes the existing tree first, if any.
pub fn reset_dir(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(Error::DeleteFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "Reset directory");
    Ok(())
}

/// Replace `path` with `content` in a single rename.
///
/// The bytes are staged in a hidden sibling file held under an exclusive
/// lock. On any failure the staging file is removed and `path` is left as
/// it was.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let staging = staging_path(path);
    let written = stage(&staging, content)
        .and_then(|()| fs::rename(&staging, path).map_err(|e| Error::io(path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&staging);
    }
    written
}

/// `.<name>.<pid>.tmp` beside `path`, so the rename never crosses filesystems.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Write and flush `content`. The lock is released when the file closes.
fn stage(staging: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(staging).map_err(|e| Error::io(staging, e))?;
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: staging.to_path_buf(),
    })?;
    file.write_all(content).map_err(|e| Error::io(staging, e))?;
    file.sync_all().map_err(|e| Error::io(staging, e))
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
