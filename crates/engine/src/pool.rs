// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool scoped to one batch.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

/// An input whose task panicked instead of producing an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPanic<I> {
    pub input: I,
    pub error: String,
}

/// Runs a task over a set of inputs with at most `workers` in flight.
///
/// Workers pull from a shared queue until it is empty. [`WorkerPool::run`]
/// returns only after every worker has finished, so nothing outlives the
/// batch that started it. Each input yields exactly one entry, in
/// completion order: its output, or a [`TaskPanic`] if its task panicked.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self { workers: workers.max(1) }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run<I, O, F, Fut>(&self, inputs: Vec<I>, task: F) -> Vec<Result<O, TaskPanic<I>>>
    where
        I: Clone + Send + 'static,
        O: Send + 'static,
        F: Fn(I) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        let total = inputs.len();
        let spawned = self.workers.min(total);
        let queue = Arc::new(Mutex::new(VecDeque::from(inputs)));

        let mut set = JoinSet::new();
        for _ in 0..spawned {
            let queue = Arc::clone(&queue);
            let task = task.clone();
            set.spawn(async move {
                let mut outputs = Vec::new();
                loop {
                    let next = queue.lock().pop_front();
                    let Some(input) = next else { break };
                    // A panicking task only loses its own item
                    let result = match tokio::spawn(task(input.clone())).await {
                        Ok(output) => Ok(output),
                        Err(e) => {
                            tracing::error!(error = %e, "worker task failed");
                            Err(TaskPanic { input, error: e.to_string() })
                        }
                    };
                    outputs.push(result);
                }
                outputs
            });
        }

        let mut outputs = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(mut done) => outputs.append(&mut done),
                Err(e) => tracing::error!(error = %e, "worker failed"),
            }
        }
        outputs
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
