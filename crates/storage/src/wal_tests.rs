// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mx_core::StepKind;
use serde_json::json;
use std::io::Write;
use tempfile::tempdir;
use yare::parameterized;

fn test_record(fp: &str) -> StepRecord {
    StepRecord::completed(StepKind::Batch, fp.to_string(), json!(200), 1_000)
}

fn append_raw(path: &Path, bytes: &[u8]) {
    let mut f = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(bytes).unwrap();
}

#[test]
fn open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");

    let wal = Wal::open(&path, 0).unwrap();

    assert!(path.exists());
    assert_eq!(wal.write_seq(), 0);
}

#[test]
fn open_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("steps.wal");

    Wal::open(&path, 0).unwrap();
    assert!(path.exists());
}

#[test]
fn append_assigns_sequence_and_flush_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    assert_eq!(wal.append(&test_record("a")).unwrap(), 1);
    assert_eq!(wal.append(&test_record("b")).unwrap(), 2);

    // Buffered only
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

    wal.flush().unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn reopen_continues_sequence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_record("a")).unwrap();
        wal.append(&test_record("b")).unwrap();
        wal.flush().unwrap();
    }

    let mut wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 2);
    assert_eq!(wal.append(&test_record("c")).unwrap(), 3);
}

#[test]
fn reopen_respects_snapshot_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");

    // Compacted log is empty but the snapshot covered seq 40
    let wal = Wal::open(&path, 40).unwrap();
    assert_eq!(wal.write_seq(), 40);
}

#[test]
fn entries_after_filters_by_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    for fp in ["a", "b", "c"] {
        wal.append(&test_record(fp)).unwrap();
    }
    wal.flush().unwrap();

    let entries = wal.entries_after(1).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[0].record.fingerprint, "b");
    assert_eq!(entries[1].seq, 3);
}

#[test]
fn unflushed_entries_are_not_visible() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&test_record("a")).unwrap();
    assert!(wal.entries_after(0).unwrap().is_empty());
}

#[test]
fn truncate_before_keeps_tail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    for fp in ["a", "b", "c"] {
        wal.append(&test_record(fp)).unwrap();
    }
    wal.flush().unwrap();

    wal.truncate_before(2).unwrap();

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);

    // Appends keep going after truncation
    assert_eq!(wal.append(&test_record("d")).unwrap(), 4);
    wal.flush().unwrap();
    assert_eq!(wal.entries_after(0).unwrap().len(), 3);
}

#[test]
fn open_corrupt_wal_creates_bak_and_preserves_valid_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&test_record("a")).unwrap();
        wal.append(&test_record("b")).unwrap();
        wal.flush().unwrap();
    }
    append_raw(&path, b"{\"seq\":3,\"rec");

    let wal = Wal::open(&path, 0).unwrap();

    assert_eq!(wal.write_seq(), 2);
    assert!(path.with_extension("bak").exists());
    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].record.fingerprint, "b");
}

#[test]
fn open_corrupt_wal_rotates_bak_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");

    // Four corrupt opens keep at most three backups
    for i in 1..=4u8 {
        std::fs::write(&path, [i; 8]).unwrap();
        let wal = Wal::open(&path, 0).unwrap();
        assert_eq!(wal.write_seq(), 0);
    }

    assert_eq!(std::fs::read(path.with_extension("bak")).unwrap(), vec![4u8; 8]);
    assert_eq!(std::fs::read(path.with_extension("bak.2")).unwrap(), vec![3u8; 8]);
    assert_eq!(std::fs::read(path.with_extension("bak.3")).unwrap(), vec![2u8; 8]);
    assert!(!path.with_extension("bak.4").exists());
}

#[parameterized(
    torn_json = { b"{\"seq\":2,\"rec" },
    binary = { b"\x80\x81\x82\xff\xfe\n" },
    wrong_shape = { b"{\"seq\":\"two\"}\n" },
    garbage_line = { b"not json\n" },
)]
fn corrupt_tail_ends_the_readable_log(tail: &[u8]) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&test_record("a")).unwrap();
    wal.flush().unwrap();

    append_raw(&path, tail);

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq, 1);
}

#[test]
fn blank_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("steps.wal");
    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&test_record("a")).unwrap();
    wal.flush().unwrap();
    append_raw(&path, b"\n\n");

    let wal = Wal::open(&path, 0).unwrap();
    assert!(!path.with_extension("bak").exists());
    assert_eq!(wal.entries_after(0).unwrap().len(), 1);
}
