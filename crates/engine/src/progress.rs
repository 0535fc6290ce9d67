// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress record writer.

use crate::error::ExportError;
use mx_adapters::BlobStore;
use mx_core::{Clock, KeyLayout, ProgressRecord, ProgressStatus, RunId};

/// Writes the run's progress record, whole, to its well-known key.
///
/// Keeps the last written record as a high-water mark (seeded from the store
/// when resuming the same run) and skips any update that would move an
/// observer backwards.
pub struct ProgressTracker<S: BlobStore, C: Clock> {
    store: S,
    clock: C,
    key: String,
    run_id: RunId,
    raw_path: String,
    last: Option<ProgressRecord>,
}

impl<S: BlobStore, C: Clock> ProgressTracker<S, C> {
    pub async fn open(
        store: S,
        clock: C,
        keys: &KeyLayout,
        run_id: RunId,
        raw_path: String,
    ) -> Result<Self, ExportError> {
        let key = keys.progress_key();
        let last = match store.get(&key).await? {
            Some(bytes) => match serde_json::from_slice::<ProgressRecord>(&bytes) {
                Ok(prev) if prev.run_id == run_id => {
                    tracing::info!(
                        %run_id,
                        processed = prev.emails_processed,
                        found = prev.emails_found,
                        "resuming progress"
                    );
                    Some(prev)
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(%key, error = %e, "ignoring unreadable progress record");
                    None
                }
            },
            None => None,
        };
        Ok(Self { store, clock, key, run_id, raw_path, last })
    }

    /// Overwrite the record. Returns whether it was written.
    pub async fn update(
        &mut self,
        processed: u64,
        found: u64,
        status: ProgressStatus,
    ) -> Result<bool, ExportError> {
        let record = ProgressRecord {
            status,
            emails_processed: processed,
            emails_found: found,
            last_updated: self.clock.utc_now(),
            run_id: self.run_id.clone(),
            raw_path: self.raw_path.clone(),
        };
        if let Some(prev) = &self.last {
            if !record.may_replace(prev) {
                tracing::debug!(processed, found, %status, "skipped stale progress update");
                return Ok(false);
            }
        }

        let bytes = serde_json::to_vec_pretty(&record)?;
        self.store.put(&self.key, bytes).await?;
        tracing::debug!(processed, found, %status, "wrote progress");
        self.last = Some(record);
        Ok(true)
    }

    pub fn last(&self) -> Option<&ProgressRecord> {
        self.last.as_ref()
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
