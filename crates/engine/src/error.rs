// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::fetcher::FetchError;
use mx_adapters::BlobError;
use mx_core::{JobParamsError, StepKind};
use mx_storage::{LockError, StepLogError};
use thiserror::Error;

/// A step failed; nothing was recorded for it.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("listing failed: {0}")]
    Listing(#[from] FetchError),
    #[error("step log: {0}")]
    Log(#[from] StepLogError),
    #[error("{step} step arguments: {source}")]
    Args { step: StepKind, source: serde_json::Error },
    #[error("{step} step result: {source}")]
    Result { step: StepKind, source: serde_json::Error },
}

/// Why an export run aborted. The step log is left intact for a resume.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid job parameters: {0}")]
    Params(#[from] JobParamsError),
    #[error("state directory: {0}")]
    Lock(#[from] LockError),
    #[error("step log: {0}")]
    Log(#[from] StepLogError),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("progress write failed: {0}")]
    Progress(#[from] BlobError),
    #[error("progress record: {0}")]
    ProgressEncode(#[from] serde_json::Error),
}
