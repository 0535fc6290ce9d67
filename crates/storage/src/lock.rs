// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive lock on a state directory.
//!
//! Only one export may drive a given step log at a time. The lock is an
//! advisory `flock` on `export.lock`, released when the process exits or
//! the [`StateLock`] is dropped.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("another export holds {}: {source}", path.display())]
    Held { path: PathBuf, source: std::io::Error },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct StateLock {
    // Held for its flock; released on drop
    file: File,
    path: PathBuf,
}

impl StateLock {
    /// Take the lock in `dir`, failing immediately if it is held.
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("export.lock");
        // Don't truncate before holding the lock: that would wipe the
        // holder's PID.
        let mut file =
            OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&path)?;
        file.try_lock_exclusive().map_err(|source| LockError::Held { path: path.clone(), source })?;

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
