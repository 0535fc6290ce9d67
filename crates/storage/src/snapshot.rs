// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compacted step-log snapshots.
//!
//! A snapshot stores every completed step record up to a WAL sequence
//! number, zstd-compressed. Recovery loads the snapshot and replays WAL
//! entries after that sequence.

use chrono::{DateTime, Utc};
use mx_core::StepRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 3;

/// Errors that can occur in snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {0} is newer than supported version {CURRENT_SNAPSHOT_VERSION}")]
    TooNew(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version
    #[serde(rename = "v")]
    pub version: u32,
    /// WAL sequence number covered by this snapshot
    pub seq: u64,
    pub records: Vec<StepRecord>,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(seq: u64, records: Vec<StepRecord>, created_at: DateTime<Utc>) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, seq, records, created_at }
    }

    /// Write atomically: compress to a temp file, then rename over `path`.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(self)?;
        let compressed = zstd::encode_all(json.as_slice(), ZSTD_LEVEL)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, compressed)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Load the snapshot at `path`, or `None` if there isn't one.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        let compressed = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let json = zstd::decode_all(compressed.as_slice())?;
        let snapshot: Snapshot = serde_json::from_slice(&json)?;
        if snapshot.version > CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::TooNew(snapshot.version));
        }
        Ok(Some(snapshot))
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
