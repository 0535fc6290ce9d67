// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Export job parameters and result.

use crate::id::RunId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WORKER_COUNT: usize = 20;
pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const DEFAULT_PAGE_SIZE: u32 = 500;
/// Largest page the listing API will return.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Rejected job parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobParamsError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("batch size must be at least 1")]
    EmptyBatch,
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    PageSize(u32),
}

/// Caller-supplied parameters of an export invocation.
///
/// These are the inputs that identify a run for resume purposes: invoking
/// again with identical parameters after a crash continues the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParams {
    /// Listing filter; empty lists the whole mailbox.
    pub query: String,
    /// Ceiling on processed items; 0 means unbounded.
    pub max_items: u64,
    pub worker_count: usize,
    pub batch_size: usize,
    pub page_size: u32,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_items: 0,
            worker_count: DEFAULT_WORKER_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl JobParams {
    pub fn new() -> Self {
        Self::default()
    }

    crate::setters! {
        into {
            query: String,
        }
        set {
            max_items: u64,
            worker_count: usize,
            batch_size: usize,
            page_size: u32,
        }
    }

    pub fn validate(&self) -> Result<(), JobParamsError> {
        if self.worker_count == 0 {
            return Err(JobParamsError::NoWorkers);
        }
        if self.batch_size == 0 {
            return Err(JobParamsError::EmptyBatch);
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(JobParamsError::PageSize(self.page_size));
        }
        Ok(())
    }

    /// The processed-count ceiling, if one is configured.
    pub fn ceiling(&self) -> Option<u64> {
        (self.max_items > 0).then_some(self.max_items)
    }
}

/// One export invocation: validated parameters plus the run identity.
///
/// Immutable for the run's duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub params: JobParams,
    pub run_id: RunId,
}

impl ExportJob {
    pub fn new(params: JobParams, run_id: RunId) -> Result<Self, JobParamsError> {
        params.validate()?;
        Ok(Self { params, run_id })
    }

    /// True once `processed` has reached the configured ceiling.
    pub fn ceiling_reached(&self, processed: u64) -> bool {
        self.params.ceiling().is_some_and(|max| processed >= max)
    }
}

/// Terminal status reported by a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Complete,
}

crate::simple_display! {
    JobStatus {
        Complete => "complete",
    }
}

/// Value returned to the invoker when a job finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub status: JobStatus,
    pub emails_found: u64,
    pub emails_processed: u64,
    pub raw_path: String,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
