// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gmail REST adapter (`users.messages.list` / `users.messages.get`).

use super::{MailboxAdapter, MailboxError};
use crate::credential::CredentialProvider;
use async_trait::async_trait;
use mx_core::{short, ItemId, Page};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GMAIL_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ListResponse {
    fn into_page(self) -> Page {
        let ids = self.messages.into_iter().map(|m| ItemId::from_string(m.id)).collect();
        Page::new(ids, self.next_page_token)
    }
}

#[derive(Clone)]
pub struct GmailAdapter<P: CredentialProvider> {
    client: reqwest::Client,
    base_url: String,
    credentials: P,
}

impl<P: CredentialProvider> GmailAdapter<P> {
    pub fn new(credentials: P) -> Result<Self, MailboxError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MailboxError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, DEFAULT_GMAIL_BASE_URL, credentials))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: P,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url, credentials }
    }

    /// Point the adapter at another API root (e.g. a local stand-in).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, MailboxError> {
        let credential = self.credentials.get_credentials().await?;
        let response = request.bearer_auth(&credential.token).send().await.map_err(from_reqwest)?;
        let status = response.status();
        let body = response.bytes().await.map_err(from_reqwest)?;
        if !status.is_success() {
            return Err(MailboxError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body.to_vec())
    }
}

fn from_reqwest(e: reqwest::Error) -> MailboxError {
    if e.is_builder() {
        MailboxError::Request(e.to_string())
    } else if e.is_decode() {
        MailboxError::Decode(e.to_string())
    } else {
        MailboxError::Transport(e.to_string())
    }
}

/// Google's `{"error": {"message": ...}}` body, or the raw text.
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => short(String::from_utf8_lossy(body).trim(), 200).to_string(),
    }
}

#[async_trait]
impl<P: CredentialProvider> MailboxAdapter for GmailAdapter<P> {
    async fn list(
        &self,
        query: &str,
        page_token: Option<&str>,
        limit: u32,
    ) -> Result<Page, MailboxError> {
        let mut params = vec![("maxResults", limit.to_string())];
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let request = self.client.get(format!("{}/messages", self.base_url)).query(&params);
        let body = self.send(request).await?;
        let list: ListResponse =
            serde_json::from_slice(&body).map_err(|e| MailboxError::Decode(e.to_string()))?;
        let page = list.into_page();
        tracing::debug!(
            ids = page.ids.len(),
            has_next = !page.is_last(),
            "listed mailbox page"
        );
        Ok(page)
    }

    async fn get(&self, id: &ItemId) -> Result<Vec<u8>, MailboxError> {
        if id.is_empty() || id.contains('/') {
            return Err(MailboxError::Request(format!("invalid item id {id:?}")));
        }
        let request = self
            .client
            .get(format!("{}/messages/{}", self.base_url, id))
            .query(&[("format", "full")]);
        self.send(request).await
    }
}

#[cfg(test)]
#[path = "gmail_tests.rs"]
mod tests;
