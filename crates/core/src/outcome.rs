// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-item results and their batch-level aggregate.

use crate::id::ItemId;
use serde::{Deserialize, Serialize};

/// What happened to one item inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Persisted { id: ItemId },
    /// The fetch failed fatally or ran out of attempts.
    FetchFailed { id: ItemId, attempts: u32, error: String },
    /// The payload was fetched but could not be written.
    PersistFailed { id: ItemId, error: String },
    /// The item's task died before reporting.
    Aborted { id: ItemId, error: String },
}

impl ItemOutcome {
    pub fn id(&self) -> &ItemId {
        match self {
            ItemOutcome::Persisted { id }
            | ItemOutcome::FetchFailed { id, .. }
            | ItemOutcome::PersistFailed { id, .. }
            | ItemOutcome::Aborted { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Persisted { .. })
    }
}

/// Aggregate of one batch's item outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub persisted: u64,
    pub fetch_failed: u64,
    pub persist_failed: u64,
    pub aborted: u64,
    /// Failed outcomes, kept for logging.
    pub failures: Vec<ItemOutcome>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Persisted { .. } => {
                self.persisted += 1;
                return;
            }
            ItemOutcome::FetchFailed { .. } => self.fetch_failed += 1,
            ItemOutcome::PersistFailed { .. } => self.persist_failed += 1,
            ItemOutcome::Aborted { .. } => self.aborted += 1,
        }
        self.failures.push(outcome);
    }

    pub fn total(&self) -> u64 {
        self.persisted + self.failed()
    }

    pub fn failed(&self) -> u64 {
        self.fetch_failed + self.persist_failed + self.aborted
    }
}

impl FromIterator<ItemOutcome> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(iter: I) -> Self {
        let mut summary = BatchSummary::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
