// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fingerprint-keyed checkpoint table backed by the WAL.
//!
//! Layout inside the state directory:
//!
//! ```text
//! steps.wal        one line per completed step since the last compaction
//! steps.snapshot   zstd-compressed records up to a WAL sequence
//! ```

use crate::snapshot::{Snapshot, SnapshotError};
use crate::wal::{Wal, WalError};
use chrono::Utc;
use mx_core::StepRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// WAL length (entries) above which `open` folds the log into a snapshot.
pub const COMPACT_THRESHOLD: usize = 1000;

#[derive(Debug, Error)]
pub enum StepLogError {
    #[error("step log: {0}")]
    Wal(#[from] WalError),
    #[error("step snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct StepLog {
    dir: PathBuf,
    wal: Wal,
    snapshot_path: PathBuf,
    records: HashMap<String, StepRecord>,
    wal_entries: usize,
}

impl StepLog {
    /// Open the log in `dir`, recovering every previously completed step.
    pub fn open(dir: &Path) -> Result<Self, StepLogError> {
        let snapshot_path = dir.join("steps.snapshot");
        let mut records = HashMap::new();
        let snapshot_seq = match Snapshot::load(&snapshot_path)? {
            Some(snapshot) => {
                for record in snapshot.records {
                    records.insert(record.fingerprint.clone(), record);
                }
                snapshot.seq
            }
            None => 0,
        };

        let wal = Wal::open(&dir.join("steps.wal"), snapshot_seq)?;
        let entries = wal.entries_after(snapshot_seq)?;
        let wal_entries = entries.len();
        for entry in entries {
            records.insert(entry.record.fingerprint.clone(), entry.record);
        }

        tracing::info!(
            dir = %dir.display(),
            snapshot_seq,
            replayed = wal_entries,
            steps = records.len(),
            "opened step log"
        );

        let mut log = Self { dir: dir.to_path_buf(), wal, snapshot_path, records, wal_entries };
        if log.wal_entries > COMPACT_THRESHOLD {
            log.compact()?;
        }
        Ok(log)
    }

    /// Completed record for `fingerprint`, if any.
    pub fn get(&self, fingerprint: &str) -> Option<&StepRecord> {
        self.records.get(fingerprint).filter(|r| r.completed)
    }

    /// Durably record a completed step. Returns once the record is synced.
    ///
    /// A fingerprint that already has a completed record is left untouched.
    pub fn record(&mut self, record: StepRecord) -> Result<(), StepLogError> {
        if self.get(&record.fingerprint).is_some() {
            return Ok(());
        }
        self.wal.append(&record)?;
        self.wal.flush()?;
        self.wal_entries += 1;
        self.records.insert(record.fingerprint.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fold every record into a snapshot and empty the WAL.
    pub fn compact(&mut self) -> Result<(), StepLogError> {
        self.wal.flush()?;
        let seq = self.wal.write_seq();
        let mut records: Vec<StepRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        Snapshot::new(seq, records, Utc::now()).save(&self.snapshot_path)?;
        self.wal.truncate_before(seq + 1)?;
        tracing::info!(seq, steps = self.records.len(), "compacted step log");
        self.wal_entries = 0;
        Ok(())
    }

    /// Forget every step (run finished; its checkpoints are garbage).
    pub fn clear(&mut self) -> Result<(), StepLogError> {
        // Snapshot first. A crash between the two leaves at most a WAL
        // tail, which either replays the finished run or matches nothing.
        match fs::remove_file(&self.snapshot_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.wal.flush()?;
        self.wal.truncate_before(self.wal.write_seq() + 1)?;
        self.records.clear();
        self.wal_entries = 0;
        Ok(())
    }

    /// Clear the log, then delete its directory.
    pub fn discard(mut self) -> Result<(), StepLogError> {
        self.clear()?;
        let dir = self.dir.clone();
        drop(self);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "step_log_tests.rs"]
mod tests;
