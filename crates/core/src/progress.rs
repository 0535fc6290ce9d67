// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Externally pollable progress snapshot.

use crate::id::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProgressStatus {
    Running,
    Complete,
}

crate::simple_display! {
    ProgressStatus {
        Running => "RUNNING",
        Complete => "COMPLETE",
    }
}

/// Snapshot of a run's counters, overwritten wholesale after every batch.
///
/// `emails_processed <= emails_found` holds for every written record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub status: ProgressStatus,
    pub emails_processed: u64,
    pub emails_found: u64,
    pub last_updated: DateTime<Utc>,
    pub run_id: RunId,
    pub raw_path: String,
}

impl ProgressRecord {
    pub fn is_complete(&self) -> bool {
        self.status == ProgressStatus::Complete
    }

    /// Whether `self` may overwrite `prev` without an observer seeing the
    /// run go backwards. A different run always may; within one run no
    /// counter may shrink and a complete record is final.
    pub fn may_replace(&self, prev: &ProgressRecord) -> bool {
        if self.run_id != prev.run_id {
            return true;
        }
        if prev.is_complete() && !self.is_complete() {
            return false;
        }
        self.emails_processed >= prev.emails_processed && self.emails_found >= prev.emails_found
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
