// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;
use yare::parameterized;

#[tokio::test]
async fn put_then_get() {
    let dir = tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    store.put("gmail-exports/raw/r1/email_a.json", b"{}".to_vec()).await.unwrap();

    let stored = store.get("gmail-exports/raw/r1/email_a.json").await.unwrap();
    assert_eq!(stored.as_deref(), Some(&b"{}"[..]));
    assert!(dir.path().join("gmail-exports/raw/r1/email_a.json").is_file());
    let files: Vec<_> = std::fs::read_dir(dir.path().join("gmail-exports/raw/r1"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["email_a.json".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_puts_of_one_key_all_succeed() {
    let dir = tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    let mut set = tokio::task::JoinSet::new();
    for i in 0..16u8 {
        let store = store.clone();
        set.spawn(async move { store.put("raw/r1/email_dup.json", vec![i; 4096]).await });
    }
    while let Some(joined) = set.join_next().await {
        joined.unwrap().unwrap();
    }

    let stored = store.get("raw/r1/email_dup.json").await.unwrap().unwrap();
    assert_eq!(stored.len(), 4096);
    assert!(stored.iter().all(|b| *b == stored[0]));
    assert_eq!(std::fs::read_dir(dir.path().join("raw/r1")).unwrap().count(), 1);
}

#[tokio::test]
async fn put_overwrites() {
    let dir = tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    store.put("progress.json", b"one".to_vec()).await.unwrap();
    store.put("progress.json", b"two".to_vec()).await.unwrap();

    assert_eq!(store.get("progress.json").await.unwrap().unwrap(), b"two");
}

#[tokio::test]
async fn missing_key_is_none() {
    let dir = tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());
    assert_eq!(store.get("nope").await.unwrap(), None);
}

#[parameterized(
    empty = { "" },
    parent = { "../escape" },
    nested_parent = { "a/../../b" },
    absolute = { "/etc/passwd" },
    directory = { "raw/" },
)]
fn invalid_keys_are_rejected(key: &str) {
    let store = FsBlobStore::new("/tmp/mx");
    assert_eq!(store.path_for(key), Err(BlobError::InvalidKey(key.to_string())));
}

#[test]
fn url_points_at_root() {
    let store = FsBlobStore::new("/var/exports/");
    assert_eq!(store.url("gmail-exports/raw/r1/"), "file:///var/exports/gmail-exports/raw/r1/");
}

#[tokio::test]
async fn fake_records_puts_and_injects_failures() {
    let store = FakeBlobStore::new();
    store.put("a", b"1".to_vec()).await.unwrap();
    store.put("a", b"22".to_vec()).await.unwrap();
    store.fail_key("b");
    assert!(store.put("b", b"3".to_vec()).await.is_err());

    assert_eq!(store.put_count("a"), 2);
    assert_eq!(store.object("a").unwrap(), b"22");
    assert_eq!(store.keys(), vec!["a".to_string()]);
    assert_eq!(store.puts().len(), 3);
}
