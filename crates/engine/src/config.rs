// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mx_core::{KeyLayout, RetryPolicy};
use std::path::{Path, PathBuf};

/// Engine tunables that are not part of a job's identity.
///
/// Changing these between a crash and a restart does not invalidate the
/// step log; changing [`mx_core::JobParams`] does.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Holds the instance lock and one step log per job.
    pub state_dir: PathBuf,
    pub keys: KeyLayout,
    pub retry: RetryPolicy,
}

impl ExportConfig {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self { state_dir: state_dir.into(), keys: KeyLayout::default(), retry: RetryPolicy::default() }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Step log directory of the job whose parameters hash to `job_key`.
    ///
    /// Each job keeps its own log so finishing one never discards the
    /// checkpoints of another that is waiting to resume.
    pub fn steps_dir(&self, job_key: &str) -> PathBuf {
        self.state_dir.join("steps").join(mx_core::short(job_key, 16))
    }

    mx_core::setters! {
        set {
            keys: KeyLayout,
            retry: RetryPolicy,
        }
    }
}
