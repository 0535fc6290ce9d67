// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrying calls against the mailbox API.

use mx_adapters::{MailboxAdapter, MailboxError};
use mx_core::{Classify, ItemId, RetryPolicy};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: MailboxError },
    #[error("{error}")]
    Fatal { attempts: u32, error: MailboxError },
}

impl FetchError {
    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::Exhausted { attempts, .. } | FetchError::Fatal { attempts, .. } => *attempts,
        }
    }

    /// The error from the last attempt.
    pub fn error(&self) -> &MailboxError {
        match self {
            FetchError::Exhausted { last, .. } => last,
            FetchError::Fatal { error, .. } => error,
        }
    }
}

/// Run `op` under `policy`: transient failures are retried after the
/// policy's backoff, fatal ones return at once.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MailboxError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let error = match op().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        match policy.next_delay(attempt, error.class()) {
            Some(delay) => {
                tracing::warn!(
                    what,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            None if error.is_transient() => {
                return Err(FetchError::Exhausted { attempts: attempt, last: error });
            }
            None => return Err(FetchError::Fatal { attempts: attempt, error }),
        }
    }
}

/// Fetches single items with retries.
#[derive(Clone)]
pub struct ItemFetcher<M: MailboxAdapter> {
    mailbox: M,
    policy: RetryPolicy,
}

impl<M: MailboxAdapter> ItemFetcher<M> {
    pub fn new(mailbox: M, policy: RetryPolicy) -> Self {
        Self { mailbox, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn fetch(&self, id: &ItemId) -> Result<Vec<u8>, FetchError> {
        with_retry(&self.policy, id.as_str(), || self.mailbox.get(id)).await
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
