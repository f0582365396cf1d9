//! Cross-process advisory locks over a data directory.
//!
//! Two `devbox` processes syncing the same app would race on its records, so
//! commands that mutate an app hold an exclusive lock file for its whole run.
//! The lock is released when the guard (and its open file) is dropped.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::debug;

use crate::error::StorageError;

/// Holds an exclusive lock until dropped.
#[derive(Debug)]
pub struct AppLock {
    _file: File,
    path: PathBuf,
}

impl AppLock {
    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AppLock {
    fn drop(&mut self) {
        // The file stays on disk; removing it would let a waiter lock an unlinked inode.
        debug!(path = %self.path.display(), "Released lock");
    }
}

/// Blocks until the exclusive lock on `path` is held.
pub(crate) async fn acquire(path: PathBuf) -> Result<AppLock, StorageError> {
    tokio::task::spawn_blocking(move || acquire_blocking(path))
        .await
        .map_err(|e| StorageError::internal(format!("lock task failed: {e}")))?
}

fn acquire_blocking(path: PathBuf) -> Result<AppLock, StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(|e| StorageError::io(&path, e))?;

    debug!(path = %path.display(), "Waiting for lock");
    FileExt::lock_exclusive(&file).map_err(|e| StorageError::io(&path, e))?;
    debug!(path = %path.display(), "Acquired lock");
    Ok(AppLock { _file: file, path })
}
