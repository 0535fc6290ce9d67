// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay-memoized step records.
//!
//! A step is identified by its fingerprint: the SHA-256 of the step name
//! and the canonical JSON encoding of its arguments. Re-invoking a step
//! whose fingerprint has a completed record returns the stored result
//! without running the step again.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// The memoized steps of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Assigns the run ID for a set of job parameters.
    Start,
    /// Lists one page of item IDs.
    Page,
    /// Fetches and persists one batch of items.
    Batch,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Start => "start",
            StepKind::Page => "page",
            StepKind::Batch => "batch",
        }
    }
}

crate::simple_display! {
    StepKind {
        Start => "start",
        Page => "page",
        Batch => "batch",
    }
}

/// Checkpoint of one completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: StepKind,
    pub fingerprint: String,
    pub result: Value,
    pub completed: bool,
    pub completed_at_ms: u64,
}

impl StepRecord {
    pub fn completed(step: StepKind, fingerprint: String, result: Value, at_ms: u64) -> Self {
        Self { step, fingerprint, result, completed: true, completed_at_ms: at_ms }
    }
}

/// Fingerprint of a step invocation.
///
/// Arguments go through `serde_json::Value` first so object keys are
/// sorted; two structurally equal argument sets always hash the same.
pub fn fingerprint<A: Serialize + ?Sized>(
    step: StepKind,
    args: &A,
) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_string(&serde_json::to_value(args)?)?;
    let mut hasher = Sha256::new();
    hasher.update(step.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
