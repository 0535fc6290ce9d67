// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mx-core: data model for the mailbox export (mx) pipeline

pub mod macros;

pub mod clock;
pub mod id;
pub mod job;
pub mod keys;
pub mod outcome;
pub mod page;
pub mod progress;
pub mod retry;
pub mod step;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, ItemId, RunId};
pub use job::{
    ExportJob, JobParams, JobParamsError, JobResult, JobStatus, DEFAULT_BATCH_SIZE,
    DEFAULT_PAGE_SIZE, DEFAULT_WORKER_COUNT, MAX_PAGE_SIZE,
};
pub use keys::KeyLayout;
pub use outcome::{BatchSummary, ItemOutcome};
pub use page::{batch_count, partition, Page};
pub use progress::{ProgressRecord, ProgressStatus};
pub use retry::{is_transient_status, Classify, ErrorClass, RetryPolicy};
pub use step::{fingerprint, StepKind, StepRecord};
