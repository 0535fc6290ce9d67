// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mailbox API: paged listing of item IDs and per-item fetch.

mod gmail;

use crate::credential::CredentialError;
use async_trait::async_trait;
use mx_core::{is_transient_status, Classify, ErrorClass, ItemId, Page};
use thiserror::Error;

pub use gmail::{GmailAdapter, DEFAULT_GMAIL_BASE_URL};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailboxError {
    #[error("mailbox API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    Request(String),
}

impl Classify for MailboxError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Status { status, .. } if is_transient_status(*status) => ErrorClass::Transient,
            Self::Transport(_) => ErrorClass::Transient,
            _ => ErrorClass::Fatal,
        }
    }
}

/// Remote mailbox
#[async_trait]
pub trait MailboxAdapter: Clone + Send + Sync + 'static {
    /// List up to `limit` item IDs matching `query`, starting at `page_token`.
    async fn list(
        &self,
        query: &str,
        page_token: Option<&str>,
        limit: u32,
    ) -> Result<Page, MailboxError>;

    /// Fetch one item's full serialized payload.
    async fn get(&self, id: &ItemId) -> Result<Vec<u8>, MailboxError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMailbox, ListCall};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
