// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job orchestrator: the page/batch loop.

use crate::config::ExportConfig;
use crate::error::{ExportError, StepError};
use crate::executor::DurableExecutor;
use crate::fetcher::ItemFetcher;
use crate::progress::ProgressTracker;
use crate::steps::{batch_step, page_step, BatchArgs, PageArgs};
use mx_adapters::{BlobStore, MailboxAdapter};
use mx_core::{
    fingerprint, Clock, ExportJob, JobParams, JobResult, JobStatus, ProgressStatus, RunId, StepKind,
};
use mx_storage::{StateLock, StepLog};

/// Counters accumulated over the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Totals {
    found: u64,
    processed: u64,
}

/// Runs export jobs against one mailbox, store, and state directory.
///
/// A run that aborts leaves its step log behind; calling [`run`] again with
/// the same [`JobParams`] resumes it, skipping every completed step.
///
/// [`run`]: ExportRunner::run
pub struct ExportRunner<M, S, C> {
    mailbox: M,
    store: S,
    clock: C,
    config: ExportConfig,
}

impl<M, S, C> ExportRunner<M, S, C>
where
    M: MailboxAdapter,
    S: BlobStore,
    C: Clock,
{
    pub fn new(mailbox: M, store: S, clock: C, config: ExportConfig) -> Self {
        Self { mailbox, store, clock, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub async fn run(&self, params: JobParams) -> Result<JobResult, ExportError> {
        params.validate()?;
        let _lock = StateLock::acquire(self.config.state_dir())?;
        let job_key = fingerprint(StepKind::Start, &params)
            .map_err(|source| StepError::Args { step: StepKind::Start, source })?;
        let steps_dir = self.config.steps_dir(&job_key);
        let executor = DurableExecutor::new(StepLog::open(&steps_dir)?, self.clock.clone());

        let run_id: RunId = executor
            .execute(StepKind::Start, &params, || async {
                Ok::<_, StepError>(RunId::from_epoch_ms(self.clock.epoch_ms()))
            })
            .await?;
        let job = ExportJob::new(params, run_id)?;
        let raw_path = self.store.url(&self.config.keys.raw_prefix(&job.run_id));
        tracing::info!(
            run_id = %job.run_id,
            query = %job.params.query,
            max_items = job.params.max_items,
            workers = job.params.worker_count,
            batch_size = job.params.batch_size,
            %raw_path,
            "export started"
        );

        let mut progress = ProgressTracker::open(
            self.store.clone(),
            self.clock.clone(),
            &self.config.keys,
            job.run_id.clone(),
            raw_path.clone(),
        )
        .await?;
        progress.update(0, 0, ProgressStatus::Running).await?;

        let totals = match self.drive(&job, &executor, &mut progress).await {
            Ok(totals) => totals,
            Err(e) => {
                tracing::error!(run_id = %job.run_id, error = %e, "export aborted");
                return Err(e);
            }
        };

        progress.update(totals.processed, totals.found, ProgressStatus::Complete).await?;
        let (executed, replayed) = (executor.executed(), executor.replayed());
        executor.discard()?;
        tracing::info!(
            run_id = %job.run_id,
            found = totals.found,
            processed = totals.processed,
            executed,
            replayed,
            "export complete"
        );

        Ok(JobResult {
            status: JobStatus::Complete,
            emails_found: totals.found,
            emails_processed: totals.processed,
            raw_path,
        })
    }

    async fn drive(
        &self,
        job: &ExportJob,
        executor: &DurableExecutor<C>,
        progress: &mut ProgressTracker<S, C>,
    ) -> Result<Totals, ExportError> {
        let params = &job.params;
        let fetcher = ItemFetcher::new(self.mailbox.clone(), self.config.retry);
        let mut totals = Totals::default();
        let mut cursor: Option<String> = None;

        loop {
            let args =
                PageArgs { query: &params.query, page_token: cursor.as_deref(), limit: params.page_size };
            let page = page_step(executor, &self.mailbox, &self.config.retry, args).await?;
            if page.is_empty() {
                break;
            }
            totals.found += page.ids.len() as u64;
            tracing::info!(run_id = %job.run_id, ids = page.ids.len(), found = totals.found, "page listed");

            for ids in page.batches(params.batch_size) {
                let args = BatchArgs { ids, run_id: &job.run_id, worker_count: params.worker_count };
                totals.processed +=
                    batch_step(executor, &fetcher, &self.store, &self.config.keys, args).await?;
                progress.update(totals.processed, totals.found, ProgressStatus::Running).await?;

                if job.ceiling_reached(totals.processed) {
                    tracing::info!(
                        run_id = %job.run_id,
                        processed = totals.processed,
                        max_items = params.max_items,
                        "item ceiling reached"
                    );
                    return Ok(totals);
                }
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
