// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mx-adapters: mailbox API, credential sources, and blob storage

pub mod blob;
pub mod credential;
pub mod mailbox;

pub use blob::{BlobError, BlobStore, FsBlobStore};
pub use credential::{
    Credential, CredentialError, CredentialProvider, CredentialSource, StaticTokenProvider,
    TokenFileProvider,
};
pub use mailbox::{GmailAdapter, MailboxAdapter, MailboxError, DEFAULT_GMAIL_BASE_URL};

#[cfg(any(test, feature = "test-support"))]
pub use blob::{BlobPut, FakeBlobStore};
#[cfg(any(test, feature = "test-support"))]
pub use credential::FakeCredentialProvider;
#[cfg(any(test, feature = "test-support"))]
pub use mailbox::{FakeMailbox, ListCall};
