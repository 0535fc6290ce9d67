// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable step executor

use crate::error::StepError;
use mx_core::{fingerprint, short, Clock, StepKind, StepRecord};
use mx_storage::{StepLog, StepLogError};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Runs steps at most once per `(step, args)` fingerprint.
///
/// A step whose fingerprint has a completed record returns the recorded
/// result without running its body. Otherwise the body runs and, on success,
/// its result is synced to the step log before being returned. A failed body
/// records nothing.
pub struct DurableExecutor<C: Clock> {
    log: Mutex<StepLog>,
    clock: C,
    executed: AtomicU64,
    replayed: AtomicU64,
}

impl<C: Clock> DurableExecutor<C> {
    pub fn new(log: StepLog, clock: C) -> Self {
        Self { log: Mutex::new(log), clock, executed: AtomicU64::new(0), replayed: AtomicU64::new(0) }
    }

    pub async fn execute<A, R, F, Fut>(
        &self,
        step: StepKind,
        args: &A,
        body: F,
    ) -> Result<R, StepError>
    where
        A: Serialize + ?Sized,
        R: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, StepError>>,
    {
        let fp = fingerprint(step, args).map_err(|source| StepError::Args { step, source })?;

        let cached = self.log.lock().get(&fp).map(|record| record.result.clone());
        if let Some(value) = cached {
            let result =
                serde_json::from_value(value).map_err(|source| StepError::Result { step, source })?;
            self.replayed.fetch_add(1, Ordering::Relaxed);
            tracing::info!(%step, fingerprint = short(&fp, 12), "replayed step");
            return Ok(result);
        }

        let start = std::time::Instant::now();
        let result = body().await?;
        let value = serde_json::to_value(&result).map_err(|source| StepError::Result { step, source })?;
        let record = StepRecord::completed(step, fp.clone(), value, self.clock.epoch_ms());
        self.log.lock().record(record)?;
        self.executed.fetch_add(1, Ordering::Relaxed);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(%step, fingerprint = short(&fp, 12), elapsed_ms, "completed step");
        Ok(result)
    }

    /// Steps whose body ran in this process.
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    /// Steps answered from the log.
    pub fn replayed(&self) -> u64 {
        self.replayed.load(Ordering::Relaxed)
    }

    /// Drop every recorded step once the run they belong to has finished.
    pub fn clear(&self) -> Result<(), StepLogError> {
        self.log.lock().clear()
    }

    /// Clear the log and delete its directory.
    pub fn discard(self) -> Result<(), StepLogError> {
        self.log.into_inner().discard()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
