// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object storage for exported payloads and the progress record.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Distinguishes temp files of concurrent puts within one process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlobError {
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    #[error("{key}: {message}")]
    Io { key: String, message: String },
}

/// Key/value blob store. Writes to an existing key replace it whole.
#[async_trait]
pub trait BlobStore: Clone + Send + Sync + 'static {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Location of `key` as reported to callers (e.g. `raw_path`).
    fn url(&self, key: &str) -> String;
}

/// Blob store rooted at a local directory. Keys map to relative paths.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        let rel = Path::new(key);
        let valid = !key.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)))
            && !key.ends_with('/');
        if !valid {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

fn io_error(key: &str, e: std::io::Error) -> BlobError {
    BlobError::Io { key: key.to_string(), message: e.to_string() }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| io_error(key, e))?;
        }
        // Readers never observe a half-written object. Concurrent puts of
        // one key each write their own temp file; the last rename wins.
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut tmp = path.clone().into_os_string();
        tmp.push(format!(".{}.{seq}.tmp", std::process::id()));
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| io_error(key, e))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn url(&self, key: &str) -> String {
        let root = self.root.display().to_string();
        format!("file://{}/{}", root.trim_end_matches('/'), key)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BlobError, BlobStore};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    /// Recorded put
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BlobPut {
        pub key: String,
        pub bytes: Vec<u8>,
    }

    #[derive(Default)]
    struct FakeBlobState {
        objects: HashMap<String, Vec<u8>>,
        puts: Vec<BlobPut>,
        failing: HashSet<String>,
        fail_all: bool,
    }

    /// In-memory blob store for testing
    #[derive(Clone, Default)]
    pub struct FakeBlobStore {
        inner: Arc<Mutex<FakeBlobState>>,
    }

    impl FakeBlobStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn object(&self, key: &str) -> Option<Vec<u8>> {
            self.inner.lock().objects.get(key).cloned()
        }

        /// Stored keys, sorted.
        pub fn keys(&self) -> Vec<String> {
            let mut keys: Vec<String> = self.inner.lock().objects.keys().cloned().collect();
            keys.sort();
            keys
        }

        /// Every put in call order, including failed ones.
        pub fn puts(&self) -> Vec<BlobPut> {
            self.inner.lock().puts.clone()
        }

        pub fn put_count(&self, key: &str) -> usize {
            self.inner.lock().puts.iter().filter(|p| p.key == key).count()
        }

        /// Every payload put to `key`, oldest first, including failed ones.
        pub fn history(&self, key: &str) -> Vec<Vec<u8>> {
            self.inner
                .lock()
                .puts
                .iter()
                .filter(|p| p.key == key)
                .map(|p| p.bytes.clone())
                .collect()
        }

        /// Make puts to `key` fail.
        pub fn fail_key(&self, key: &str) {
            self.inner.lock().failing.insert(key.to_string());
        }

        /// Make every put fail (or succeed again).
        pub fn set_fail_all(&self, fail: bool) {
            self.inner.lock().fail_all = fail;
        }
    }

    #[async_trait]
    impl BlobStore for FakeBlobStore {
        async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobError> {
            let mut inner = self.inner.lock();
            inner.puts.push(BlobPut { key: key.to_string(), bytes: bytes.clone() });
            if inner.fail_all || inner.failing.contains(key) {
                return Err(BlobError::Io { key: key.to_string(), message: "injected".into() });
            }
            inner.objects.insert(key.to_string(), bytes);
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
            Ok(self.inner.lock().objects.get(key).cloned())
        }

        fn url(&self, key: &str) -> String {
            format!("mem://{key}")
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{BlobPut, FakeBlobStore};

#[cfg(test)]
#[path = "blob_tests.rs"]
mod tests;
