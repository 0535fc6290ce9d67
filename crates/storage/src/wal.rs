// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log of step records.
//!
//! One JSON object per line: `{"seq":N,"record":{...}}`. Sequence numbers
//! start at 1 and increase by one per append. A torn or corrupt tail (a
//! crash mid-write, stray bytes) ends the readable log; on open the
//! corrupt file is rotated to `.bak` and the valid prefix is kept.

use crate::snapshot::rotate_bak_path;
use mx_core::StepRecord;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub record: StepRecord,
}

pub struct Wal {
    path: PathBuf,
    file: File,
    write_seq: u64,
    buffer: Vec<u8>,
}

impl Wal {
    /// Open (or create) the log at `path`.
    ///
    /// `min_seq` is the sequence already covered by a snapshot; the next
    /// append is numbered after whichever is larger, it or the last entry.
    pub fn open(path: &Path, min_seq: u64) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let (entries, corrupt) = if path.exists() { read_entries(path)? } else { (Vec::new(), false) };
        if corrupt {
            let bak = rotate_bak_path(path);
            tracing::warn!(
                path = %path.display(),
                bak = %bak.display(),
                valid_entries = entries.len(),
                "corrupt step log tail, keeping valid prefix"
            );
            fs::rename(path, &bak)?;
            write_entries(path, &entries)?;
        }

        let last_seq = entries.last().map(|e| e.seq).unwrap_or(0);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), file, write_seq: last_seq.max(min_seq), buffer: Vec::new() })
    }

    /// Buffer a record; returns its sequence number. Not durable until
    /// [`Wal::flush`].
    pub fn append(&mut self, record: &StepRecord) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let entry = WalEntry { seq, record: record.clone() };
        serde_json::to_writer(&mut self.buffer, &entry)?;
        self.buffer.push(b'\n');
        self.write_seq = seq;
        Ok(seq)
    }

    /// Write buffered entries and sync them to disk.
    pub fn flush(&mut self) -> Result<(), WalError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.file.write_all(&self.buffer)?;
        self.file.sync_data()?;
        self.buffer.clear();
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushed entries with `seq > after`, stopping at the first corrupt line.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>, WalError> {
        let (entries, _) = read_entries(&self.path)?;
        Ok(entries.into_iter().filter(|e| e.seq > after).collect())
    }

    /// Drop every entry with `seq < keep_from` (snapshot compaction).
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<(), WalError> {
        self.flush()?;
        let (entries, _) = read_entries(&self.path)?;
        let kept: Vec<WalEntry> = entries.into_iter().filter(|e| e.seq >= keep_from).collect();
        write_entries(&self.path, &kept)?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        Ok(())
    }
}

/// Parse the log, returning the valid prefix and whether anything after it
/// was unreadable.
fn read_entries(path: &Path) -> Result<(Vec<WalEntry>, bool), WalError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok((entries, false));
        }
        let text = match std::str::from_utf8(&line) {
            Ok(text) => text.trim(),
            Err(_) => return Ok((entries, true)),
        };
        if text.is_empty() {
            continue;
        }
        match serde_json::from_str::<WalEntry>(text) {
            Ok(entry) => entries.push(entry),
            Err(_) => return Ok((entries, true)),
        }
    }
}

/// Atomically replace the log with `entries` (temp file + rename).
fn write_entries(path: &Path, entries: &[WalEntry]) -> Result<(), WalError> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        for entry in entries {
            serde_json::to_writer(&mut file, entry)?;
            file.write_all(b"\n")?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
