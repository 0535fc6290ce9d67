// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listing pages and their partition into batches.

use crate::id::ItemId;
use serde::{Deserialize, Serialize};

/// One listing-API response: a bounded, ordered set of item IDs plus the
/// continuation cursor for the next request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub ids: Vec<ItemId>,
    /// `None` when the listing is exhausted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl Page {
    /// Build a page, treating an empty cursor as the end of the listing.
    pub fn new(ids: Vec<ItemId>, next_cursor: Option<String>) -> Self {
        Self { ids, next_cursor: next_cursor.filter(|c| !c.is_empty()) }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    /// Contiguous batches of at most `batch_size` IDs, in listing order.
    pub fn batches(&self, batch_size: usize) -> std::slice::Chunks<'_, ItemId> {
        self.ids.chunks(batch_size.max(1))
    }
}

/// Split `ids` into `⌈len / batch_size⌉` contiguous batches covering every
/// ID exactly once, order preserved.
pub fn partition(ids: &[ItemId], batch_size: usize) -> Vec<Vec<ItemId>> {
    ids.chunks(batch_size.max(1)).map(<[ItemId]>::to_vec).collect()
}

/// Number of batches a page of `len` IDs splits into.
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size.max(1))
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
