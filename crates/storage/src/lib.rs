// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage for export runs: the step checkpoint log and the
//! single-instance state lock.

mod lock;
mod snapshot;
mod step_log;
mod wal;

pub use lock::{LockError, StateLock};
pub use snapshot::{Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use step_log::{StepLog, StepLogError, COMPACT_THRESHOLD};
pub use wal::{Wal, WalEntry, WalError};
