// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Page and batch steps.
//!
//! Both run through the [`DurableExecutor`], so their results are memoized
//! by fingerprint of the arguments below. Anything that changes what a step
//! does must be part of its arguments.

use crate::error::StepError;
use crate::executor::DurableExecutor;
use crate::fetcher::{with_retry, ItemFetcher};
use crate::pool::WorkerPool;
use mx_adapters::{BlobStore, MailboxAdapter};
use mx_core::{BatchSummary, Clock, ItemId, ItemOutcome, KeyLayout, Page, RetryPolicy, RunId, StepKind};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PageArgs<'a> {
    pub query: &'a str,
    pub page_token: Option<&'a str>,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchArgs<'a> {
    pub ids: &'a [ItemId],
    pub run_id: &'a RunId,
    pub worker_count: usize,
}

/// List one page of IDs. Transient listing errors are retried; anything
/// else fails the step.
pub async fn page_step<M, C>(
    executor: &DurableExecutor<C>,
    mailbox: &M,
    policy: &RetryPolicy,
    args: PageArgs<'_>,
) -> Result<Page, StepError>
where
    M: MailboxAdapter,
    C: Clock,
{
    executor
        .execute(StepKind::Page, &args, || async {
            let page = with_retry(policy, "list", || {
                mailbox.list(args.query, args.page_token, args.limit)
            })
            .await?;
            Ok::<_, StepError>(page)
        })
        .await
}

/// Fetch and persist one batch; the step result is the number persisted.
pub async fn batch_step<M, S, C>(
    executor: &DurableExecutor<C>,
    fetcher: &ItemFetcher<M>,
    store: &S,
    keys: &KeyLayout,
    args: BatchArgs<'_>,
) -> Result<u64, StepError>
where
    M: MailboxAdapter,
    S: BlobStore,
    C: Clock,
{
    executor
        .execute(StepKind::Batch, &args, || async {
            let summary =
                run_batch(fetcher, store, keys, args.run_id, args.ids, args.worker_count).await;
            for failure in &summary.failures {
                tracing::warn!(run_id = %args.run_id, ?failure, "dropped item");
            }
            tracing::info!(
                run_id = %args.run_id,
                items = args.ids.len(),
                persisted = summary.persisted,
                fetch_failed = summary.fetch_failed,
                persist_failed = summary.persist_failed,
                aborted = summary.aborted,
                "batch finished"
            );
            Ok::<_, StepError>(summary.persisted)
        })
        .await
}

/// Fetch every ID on a pool of `workers` and persist each payload under its
/// item key. Per-item failures are collected, never propagated.
pub async fn run_batch<M, S>(
    fetcher: &ItemFetcher<M>,
    store: &S,
    keys: &KeyLayout,
    run_id: &RunId,
    ids: &[ItemId],
    workers: usize,
) -> BatchSummary
where
    M: MailboxAdapter,
    S: BlobStore,
{
    let task = {
        let fetcher = fetcher.clone();
        let store = store.clone();
        let keys = keys.clone();
        let run_id = run_id.clone();
        move |id: ItemId| {
            let fetcher = fetcher.clone();
            let store = store.clone();
            let key = keys.item_key(&run_id, &id);
            async move { process_item(&fetcher, &store, key, id).await }
        }
    };
    WorkerPool::new(workers)
        .run(ids.to_vec(), task)
        .await
        .into_iter()
        .map(|result| {
            result.unwrap_or_else(|lost| ItemOutcome::Aborted { id: lost.input, error: lost.error })
        })
        .collect()
}

async fn process_item<M, S>(fetcher: &ItemFetcher<M>, store: &S, key: String, id: ItemId) -> ItemOutcome
where
    M: MailboxAdapter,
    S: BlobStore,
{
    let payload = match fetcher.fetch(&id).await {
        Ok(payload) => payload,
        Err(e) => {
            return ItemOutcome::FetchFailed {
                id,
                attempts: e.attempts(),
                error: e.error().to_string(),
            };
        }
    };
    match store.put(&key, payload).await {
        Ok(()) => ItemOutcome::Persisted { id },
        Err(e) => ItemOutcome::PersistFailed { id, error: e.to_string() },
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
