// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth credentials for the mailbox API.
//!
//! Refreshing tokens is somebody else's job: the file provider re-reads its
//! token file on every call, so an external refresher can rewrite it while an
//! export is running.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no credentials: {0}")]
    Missing(String),
    #[error("failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    #[error("malformed credentials: {0}")]
    Parse(String),
    #[error("access token expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Bearer token plus the metadata an OAuth token file carries.
///
/// Unknown fields (client id, scopes, token uri) are ignored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self { token: token.into(), refresh_token: None, expiry: None }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }
}

// Tokens never end up in logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Source of a valid credential, consulted before every API call.
#[async_trait]
pub trait CredentialProvider: Clone + Send + Sync + 'static {
    async fn get_credentials(&self) -> Result<Credential, CredentialError>;
}

/// Reads an OAuth token JSON file.
#[derive(Debug, Clone)]
pub struct TokenFileProvider {
    path: PathBuf,
}

impl TokenFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialProvider for TokenFileProvider {
    async fn get_credentials(&self) -> Result<Credential, CredentialError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::Missing(format!(
                    "token file {} does not exist",
                    self.path.display()
                )));
            }
            Err(e) => {
                return Err(CredentialError::Read {
                    path: self.path.clone(),
                    message: e.to_string(),
                });
            }
        };
        let credential: Credential =
            serde_json::from_slice(&bytes).map_err(|e| CredentialError::Parse(e.to_string()))?;
        if credential.token.is_empty() {
            return Err(CredentialError::Parse("token is empty".into()));
        }
        if let Some(expiry) = credential.expiry.filter(|_| credential.is_expired(Utc::now())) {
            return Err(CredentialError::Expired(expiry));
        }
        Ok(credential)
    }
}

/// A fixed bearer token, e.g. from `MX_ACCESS_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    credential: Credential,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { credential: Credential::bearer(token) }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn get_credentials(&self) -> Result<Credential, CredentialError> {
        if self.credential.token.is_empty() {
            return Err(CredentialError::Missing("access token is empty".into()));
        }
        Ok(self.credential.clone())
    }
}

/// Credential source picked at startup: an explicit token wins over the file.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Static(StaticTokenProvider),
    File(TokenFileProvider),
}

impl CredentialSource {
    pub fn resolve(access_token: Option<String>, token_file: impl Into<PathBuf>) -> Self {
        match access_token.filter(|t| !t.is_empty()) {
            Some(token) => Self::Static(StaticTokenProvider::new(token)),
            None => Self::File(TokenFileProvider::new(token_file)),
        }
    }
}

#[async_trait]
impl CredentialProvider for CredentialSource {
    async fn get_credentials(&self) -> Result<Credential, CredentialError> {
        match self {
            Self::Static(p) => p.get_credentials().await,
            Self::File(p) => p.get_credentials().await,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Credential, CredentialError, CredentialProvider};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct FakeCredentialState {
        result: Result<Credential, CredentialError>,
        calls: usize,
    }

    /// Fake credential provider for testing
    #[derive(Clone)]
    pub struct FakeCredentialProvider {
        inner: Arc<Mutex<FakeCredentialState>>,
    }

    impl Default for FakeCredentialProvider {
        fn default() -> Self {
            Self::new("fake-token")
        }
    }

    impl FakeCredentialProvider {
        pub fn new(token: &str) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeCredentialState {
                    result: Ok(Credential::bearer(token)),
                    calls: 0,
                })),
            }
        }

        /// Make every subsequent call fail with `error`.
        pub fn fail_with(&self, error: CredentialError) {
            self.inner.lock().result = Err(error);
        }

        pub fn calls(&self) -> usize {
            self.inner.lock().calls
        }
    }

    #[async_trait]
    impl CredentialProvider for FakeCredentialProvider {
        async fn get_credentials(&self) -> Result<Credential, CredentialError> {
            let mut inner = self.inner.lock();
            inner.calls += 1;
            inner.result.clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCredentialProvider;

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
