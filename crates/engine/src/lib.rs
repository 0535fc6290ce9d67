// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mx-engine: durable, resumable export of a remote mailbox.
//!
//! The [`ExportRunner`] drives page and batch steps through a
//! [`DurableExecutor`], which memoizes every completed step in the step log
//! so a restarted run skips finished work.

mod config;
mod error;
mod executor;
mod fetcher;
mod pool;
mod progress;
mod runner;
mod steps;

pub use config::ExportConfig;
pub use error::{ExportError, StepError};
pub use executor::DurableExecutor;
pub use fetcher::{with_retry, FetchError, ItemFetcher};
pub use pool::{TaskPanic, WorkerPool};
pub use progress::ProgressTracker;
pub use runner::ExportRunner;
pub use steps::{batch_step, page_step, run_batch, BatchArgs, PageArgs};
