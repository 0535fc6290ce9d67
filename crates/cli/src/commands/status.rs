// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mx status`: show the last written progress record.

use crate::env;
use crate::exit_error::ExitError;
use chrono::{DateTime, Utc};
use clap::Args;
use mx_adapters::{BlobStore, FsBlobStore};
use mx_core::{KeyLayout, ProgressRecord};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the raw progress record as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(args: StatusArgs) -> anyhow::Result<()> {
    let state_dir = env::state_dir()?;
    let store = FsBlobStore::new(env::output_dir(&state_dir));
    let key = KeyLayout::new(env::prefix()).progress_key();

    let Some(bytes) = store.get(&key).await? else {
        return Err(ExitError::aborted(format!("no export progress at {}", store.url(&key))).into());
    };
    let record: ProgressRecord = serde_json::from_slice(&bytes)
        .map_err(|e| ExitError::aborted(format!("unreadable progress record: {e}")))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", render(&record, Utc::now()));
    }
    Ok(())
}

pub(crate) fn render(record: &ProgressRecord, now: DateTime<Utc>) -> String {
    let percent = match record.emails_found {
        0 => String::new(),
        found => format!(" ({}%)", record.emails_processed * 100 / found),
    };
    let updated = record.last_updated.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let mut out = String::new();
    out.push_str(&format!("Run:        {}\n", record.run_id));
    out.push_str(&format!("Status:     {}\n", record.status));
    out.push_str(&format!(
        "Processed:  {} / {} found{}\n",
        record.emails_processed, record.emails_found, percent
    ));
    out.push_str(&format!("Updated:    {} ({} ago)\n", updated, format_ago(record.last_updated, now)));
    out.push_str(&format!("Raw path:   {}\n", record.raw_path));
    out
}

/// Coarse age: "5s", "2m", "1h", "3d".
pub(crate) fn format_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
