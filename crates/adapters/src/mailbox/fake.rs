// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory mailbox with scriptable failures.

use super::{MailboxAdapter, MailboxError};
use async_trait::async_trait;
use mx_core::{ItemId, Page};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Recorded `list` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub query: String,
    pub page_token: Option<String>,
    pub limit: u32,
}

struct ScriptedFailure {
    error: MailboxError,
    /// `None` fails forever
    remaining: Option<u32>,
}

#[derive(Default)]
struct FakeMailboxState {
    ids: Vec<ItemId>,
    get_failures: HashMap<ItemId, ScriptedFailure>,
    list_failures: HashMap<usize, MailboxError>,
    get_calls: HashMap<ItemId, u32>,
    list_calls: Vec<ListCall>,
}

/// Fake mailbox for testing.
///
/// Cursors are opaque `offset-N` strings; payloads are small JSON objects
/// carrying the item ID.
#[derive(Clone, Default)]
pub struct FakeMailbox {
    inner: Arc<Mutex<FakeMailboxState>>,
}

impl FakeMailbox {
    pub fn new(ids: Vec<ItemId>) -> Self {
        Self { inner: Arc::new(Mutex::new(FakeMailboxState { ids, ..Default::default() })) }
    }

    /// Mailbox holding `msg-00000` .. `msg-{n-1}`.
    pub fn with_items(n: usize) -> Self {
        Self::new(mx_core::test_support::item_ids(n))
    }

    /// Payload `get` returns for `id`.
    pub fn payload(id: &ItemId) -> Vec<u8> {
        serde_json::json!({ "id": id, "snippet": format!("message {id}") }).to_string().into_bytes()
    }

    /// Fail the next `times` fetches of `id`, then succeed.
    pub fn fail_get_times(&self, id: &ItemId, error: MailboxError, times: u32) {
        self.inner
            .lock()
            .get_failures
            .insert(id.clone(), ScriptedFailure { error, remaining: Some(times) });
    }

    /// Fail every fetch of `id`.
    pub fn fail_get_always(&self, id: &ItemId, error: MailboxError) {
        self.inner.lock().get_failures.insert(id.clone(), ScriptedFailure { error, remaining: None });
    }

    /// Fail the `call`-th list call (0-based, counted across the fake's life).
    pub fn fail_list_at(&self, call: usize, error: MailboxError) {
        self.inner.lock().list_failures.insert(call, error);
    }

    pub fn get_calls(&self, id: &ItemId) -> u32 {
        self.inner.lock().get_calls.get(id).copied().unwrap_or(0)
    }

    pub fn total_get_calls(&self) -> u32 {
        self.inner.lock().get_calls.values().sum()
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.inner.lock().list_calls.clone()
    }
}

fn parse_offset(token: Option<&str>) -> Result<usize, MailboxError> {
    match token {
        None => Ok(0),
        Some(t) => t
            .strip_prefix("offset-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| MailboxError::Status { status: 400, message: format!("bad token {t}") }),
    }
}

#[async_trait]
impl MailboxAdapter for FakeMailbox {
    async fn list(
        &self,
        query: &str,
        page_token: Option<&str>,
        limit: u32,
    ) -> Result<Page, MailboxError> {
        let mut inner = self.inner.lock();
        let call = inner.list_calls.len();
        inner.list_calls.push(ListCall {
            query: query.to_string(),
            page_token: page_token.map(str::to_string),
            limit,
        });
        if let Some(error) = inner.list_failures.remove(&call) {
            return Err(error);
        }

        let start = parse_offset(page_token)?.min(inner.ids.len());
        let end = start.saturating_add(limit as usize).min(inner.ids.len());
        let ids = inner.ids[start..end].to_vec();
        let next = (end < inner.ids.len()).then(|| format!("offset-{end}"));
        Ok(Page::new(ids, next))
    }

    async fn get(&self, id: &ItemId) -> Result<Vec<u8>, MailboxError> {
        let mut inner = self.inner.lock();
        *inner.get_calls.entry(id.clone()).or_default() += 1;

        if let Some(failure) = inner.get_failures.get_mut(id) {
            match failure.remaining {
                None => return Err(failure.error.clone()),
                Some(n) if n > 0 => {
                    failure.remaining = Some(n - 1);
                    return Err(failure.error.clone());
                }
                Some(_) => {}
            }
        }
        if !inner.ids.contains(id) {
            return Err(MailboxError::Status { status: 404, message: format!("{id} not found") });
        }
        Ok(Self::payload(id))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
