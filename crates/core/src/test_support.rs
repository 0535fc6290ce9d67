// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{ItemId, KeyLayout, ProgressRecord, ProgressStatus, RunId};
use chrono::{DateTime, Utc};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::ItemId;
    use proptest::prelude::*;

    /// Listing-shaped ID sequences (16 hex chars, like mailbox message IDs).
    pub fn arb_item_ids(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<ItemId>> {
        proptest::collection::vec("[0-9a-f]{16}".prop_map(ItemId::from), len)
    }
}

// ── Factories ───────────────────────────────────────────────────────────

/// `n` distinct IDs: `msg-00000`, `msg-00001`, …
pub fn item_ids(n: usize) -> Vec<ItemId> {
    (0..n).map(item_id).collect()
}

pub fn item_id(i: usize) -> ItemId {
    ItemId::from(format!("msg-{i:05}"))
}

/// A progress record stamped 2026-01-16T09:30:00Z under the default layout.
pub fn progress(run_id: &str, processed: u64, found: u64, status: ProgressStatus) -> ProgressRecord {
    let run_id = RunId::from(run_id);
    ProgressRecord {
        status,
        emails_processed: processed,
        emails_found: found,
        last_updated: DateTime::<Utc>::from_timestamp_millis(1_768_555_800_000).unwrap_or_default(),
        raw_path: format!("file:///exports/{}", KeyLayout::default().raw_prefix(&run_id)),
        run_id,
    }
}
