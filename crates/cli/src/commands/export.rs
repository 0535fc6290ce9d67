// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mx export`

use crate::env;
use crate::exit_error::ExitError;
use clap::Args;
use mx_adapters::{CredentialSource, FsBlobStore, GmailAdapter};
use mx_core::{
    JobParams, KeyLayout, SystemClock, DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_WORKER_COUNT,
    MAX_PAGE_SIZE,
};
use mx_engine::{ExportConfig, ExportError, ExportRunner};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Mailbox search query; empty exports every message
    #[arg(long, short, default_value = "")]
    pub query: String,

    /// Stop once this many items are persisted (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub max_items: u64,

    /// Concurrent fetches per batch
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Items per batch (one checkpoint each)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// IDs requested per listing call (1-500)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

impl ExportArgs {
    pub fn params(&self) -> JobParams {
        JobParams::new()
            .query(self.query.as_str())
            .max_items(self.max_items)
            .worker_count(self.workers)
            .batch_size(self.batch_size)
            .page_size(self.page_size.clamp(1, MAX_PAGE_SIZE))
    }
}

pub async fn handle(args: ExportArgs) -> anyhow::Result<()> {
    let params = args.params();
    params.validate().map_err(|e| ExitError::usage(e.to_string()))?;

    let state_dir = env::state_dir()?;
    let output_dir = env::output_dir(&state_dir);
    let credentials = CredentialSource::resolve(env::access_token(), env::token_file(&state_dir));
    let mut mailbox = GmailAdapter::new(credentials)?;
    if let Some(url) = env::gmail_base_url() {
        mailbox = mailbox.with_base_url(url);
    }

    let config = ExportConfig::new(&state_dir)
        .keys(KeyLayout::new(env::prefix()))
        .retry(env::retry_policy());
    tracing::debug!(
        state_dir = %state_dir.display(),
        output_dir = %output_dir.display(),
        "export configured"
    );
    let runner = ExportRunner::new(mailbox, FsBlobStore::new(output_dir), SystemClock, config);

    match runner.run(params).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(ExportError::Params(e)) => Err(ExitError::usage(e.to_string()).into()),
        Err(e @ ExportError::Lock(_)) => Err(ExitError::aborted(e.to_string()).into()),
        Err(e) => Err(ExitError::aborted(format!(
            "export aborted: {e}\nrerun the same command to resume"
        ))
        .into()),
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
