// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the mx binary.

use crate::exit_error::ExitError;
use mx_core::keys::DEFAULT_PREFIX;
use mx_core::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use mx_core::RetryPolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve state directory: MX_STATE_DIR > XDG_STATE_HOME/mx > ~/.local/state/mx
pub fn state_dir() -> Result<PathBuf, ExitError> {
    if let Some(dir) = non_empty("MX_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("mx"));
    }
    let home = non_empty("HOME")
        .ok_or_else(|| ExitError::usage("cannot locate a state directory: set MX_STATE_DIR"))?;
    Ok(PathBuf::from(home).join(".local/state/mx"))
}

/// Root of the exported blobs (default `<state>/exports`).
pub fn output_dir(state_dir: &Path) -> PathBuf {
    non_empty("MX_OUTPUT_DIR").map(PathBuf::from).unwrap_or_else(|| state_dir.join("exports"))
}

/// Key prefix for payloads and the progress record. May be set empty.
pub fn prefix() -> String {
    std::env::var("MX_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// OAuth token file (default `<state>/token.json`).
pub fn token_file(state_dir: &Path) -> PathBuf {
    non_empty("MX_TOKEN_FILE").map(PathBuf::from).unwrap_or_else(|| state_dir.join("token.json"))
}

/// Bearer token that bypasses the token file.
pub fn access_token() -> Option<String> {
    non_empty("MX_ACCESS_TOKEN")
}

/// Mailbox API root override.
pub fn gmail_base_url() -> Option<String> {
    non_empty("MX_GMAIL_BASE_URL")
}

/// Retry policy from MX_RETRY_ATTEMPTS / MX_RETRY_BASE_MS.
pub fn retry_policy() -> RetryPolicy {
    let attempts = parsed::<u32>("MX_RETRY_ATTEMPTS").unwrap_or(DEFAULT_MAX_ATTEMPTS);
    let base = parsed::<u64>("MX_RETRY_BASE_MS").map(Duration::from_millis).unwrap_or(DEFAULT_BASE_DELAY);
    RetryPolicy::new(attempts, base)
}

/// Log filter directives (default `info`).
pub fn log_filter() -> String {
    non_empty("MX_LOG").unwrap_or_else(|| "info".to_string())
}

pub fn log_file() -> Option<PathBuf> {
    non_empty("MX_LOG_FILE").map(PathBuf::from)
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
