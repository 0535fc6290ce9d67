// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::collections::HashMap;

#[test]
fn fingerprint_is_stable_hex() {
    let a = fingerprint(StepKind::Page, &json!({"query": "", "page_token": null})).unwrap();
    let b = fingerprint(StepKind::Page, &json!({"query": "", "page_token": null})).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn fingerprint_ignores_key_order() {
    let mut first = HashMap::new();
    first.insert("run_id", "r1");
    first.insert("worker_count", "20");
    let ordered = json!({"run_id": "r1", "worker_count": "20"});

    assert_eq!(
        fingerprint(StepKind::Batch, &first).unwrap(),
        fingerprint(StepKind::Batch, &ordered).unwrap()
    );
}

#[test]
fn fingerprint_depends_on_step_name() {
    let args = json!({"query": ""});
    assert_ne!(
        fingerprint(StepKind::Page, &args).unwrap(),
        fingerprint(StepKind::Start, &args).unwrap()
    );
}

#[test]
fn fingerprint_depends_on_args() {
    let a = fingerprint(StepKind::Page, &json!({"page_token": "a"})).unwrap();
    let b = fingerprint(StepKind::Page, &json!({"page_token": "b"})).unwrap();
    assert_ne!(a, b);
}

#[test]
fn record_serializes_step_name() {
    let record = StepRecord::completed(StepKind::Batch, "ff".into(), json!(200), 7);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["step"], "batch");
    assert_eq!(value["completed"], true);
    assert_eq!(value["result"], 200);
    assert_eq!(StepKind::Batch.to_string(), "batch");
}
