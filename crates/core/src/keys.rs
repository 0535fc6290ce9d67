// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object key layout inside the persistence store.
//!
//! ```text
//! {prefix}/progress.json                     progress record (one per prefix)
//! {prefix}/raw/{run_id}/email_{item_id}.json raw item payloads
//! ```

use crate::id::{ItemId, RunId};

pub const DEFAULT_PREFIX: &str = "gmail-exports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    prefix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl KeyLayout {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self { prefix: prefix.trim_matches('/').to_string() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Well-known location of the progress record.
    pub fn progress_key(&self) -> String {
        self.join("progress.json")
    }

    /// Directory-like key prefix holding one run's raw payloads (trailing `/`).
    pub fn raw_prefix(&self, run_id: &RunId) -> String {
        self.join(&format!("raw/{run_id}/"))
    }

    /// Key for one item's raw payload. Stable for a given (run, item) pair.
    pub fn item_key(&self, run_id: &RunId, item_id: &ItemId) -> String {
        format!("{}email_{item_id}.json", self.raw_prefix(run_id))
    }

    fn join(&self, rest: &str) -> String {
        if self.prefix.is_empty() {
            rest.to_string()
        } else {
            format!("{}/{rest}", self.prefix)
        }
    }
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
