// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mx export` specs

use crate::prelude::*;

#[test]
fn invalid_flags_are_usage_errors() {
    let ws = Workspace::new();
    ws.mx().args(&["export", "--workers", "0"]).fails().code(2).stderr_has("worker count");
    ws.mx().args(&["export", "--batch-size", "0"]).fails().code(2).stderr_has("batch size");
}

#[test]
fn missing_credentials_abort_resumably() {
    let ws = Workspace::new();

    ws.mx()
        .args(&["export"])
        .fails()
        .code(1)
        .stderr_has("no credentials")
        .stderr_has("rerun the same command to resume");

    // The run announced itself before failing and kept its checkpoints
    let progress = ws.read_json("gmail-exports/progress.json");
    assert_eq!(progress["status"], "RUNNING");
    assert_eq!(progress["emails_processed"], 0);
    let jobs: Vec<_> = std::fs::read_dir(ws.state_dir().join("steps")).unwrap().collect();
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].as_ref().unwrap().path().join("steps.wal").exists());
}

#[test]
fn exports_every_message() {
    let ws = Workspace::new();
    let stub = StubMailbox::start(&["18c1", "18c2", "18c3"], "test-token");

    let run = ws
        .mx()
        .env("MX_ACCESS_TOKEN", "test-token")
        .env("MX_GMAIL_BASE_URL", stub.url())
        .args(&["export", "--batch-size", "2", "--workers", "2"])
        .passes();
    let result = run.stdout_json();

    assert_eq!(result["status"], "complete");
    assert_eq!(result["emails_found"], 3);
    assert_eq!(result["emails_processed"], 3);

    let progress = ws.read_json("gmail-exports/progress.json");
    assert_eq!(progress["status"], "COMPLETE");
    assert_eq!(progress["emails_processed"], 3);
    assert_eq!(progress["raw_path"], result["raw_path"]);

    let run_id = progress["run_id"].as_str().unwrap().to_string();
    let payload = ws.read_json(&format!("gmail-exports/raw/{run_id}/email_18c2.json"));
    assert_eq!(payload["id"], "18c2");
}

#[test]
fn wrong_token_aborts_before_any_item() {
    let ws = Workspace::new();
    let stub = StubMailbox::start(&["18c1"], "right-token");

    ws.mx()
        .env("MX_ACCESS_TOKEN", "wrong-token")
        .env("MX_GMAIL_BASE_URL", stub.url())
        .args(&["export"])
        .fails()
        .code(1)
        .stderr_has("401");

    assert!(!ws.export_path("gmail-exports/raw").exists());
}

#[test]
fn second_instance_is_refused() {
    let ws = Workspace::new();
    let lock_path = ws.state_dir().join("export.lock");
    let file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&lock_path).unwrap();
    fs2::FileExt::lock_exclusive(&file).unwrap();

    ws.mx().args(&["export"]).fails().code(1).stderr_has("another export");
}
