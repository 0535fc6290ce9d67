// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error classification and exponential backoff.

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// How a failed remote call should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rate limiting or a server-side failure; worth retrying.
    Transient,
    /// Anything else (bad credentials, missing item, malformed response).
    Fatal,
}

crate::simple_display! {
    ErrorClass {
        Transient => "transient",
        Fatal => "fatal",
    }
}

/// Errors that know whether they are worth retrying.
pub trait Classify {
    fn class(&self) -> ErrorClass;

    fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

/// Rate limiting (429) and 5xx gateway/server failures are transient.
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Bounded retry with a doubling delay.
///
/// Delay before retry `n` (0-based) is `base * 2^n + base`; with a one
/// second base that is 2s, 3s, 5s. Nothing is slept after the last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay: DEFAULT_BASE_DELAY }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based) before
    /// the next one, or `None` if the error should not be retried.
    pub fn next_delay(&self, attempt: u32, class: ErrorClass) -> Option<Duration> {
        if class == ErrorClass::Fatal || attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff(attempt.saturating_sub(1)))
    }

    /// Backoff before retry number `n` (0-based).
    pub fn backoff(&self, n: u32) -> Duration {
        let factor = 1u32.checked_shl(n).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).saturating_add(self.base_delay)
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
