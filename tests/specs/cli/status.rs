// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mx status` specs

use crate::prelude::*;

const RUNNING: &str = r#"{
  "status": "RUNNING",
  "emails_processed": 400,
  "emails_found": 1200,
  "last_updated": "2026-01-16T09:30:00Z",
  "run_id": "20260116_093000",
  "raw_path": "file:///exports/gmail-exports/raw/20260116_093000/"
}"#;

#[test]
fn no_progress_yet() {
    let ws = Workspace::new();
    ws.mx().args(&["status"]).fails().code(1).stderr_has("no export progress");
}

#[test]
fn shows_progress_table() {
    let ws = Workspace::new();
    ws.write("gmail-exports/progress.json", RUNNING);

    ws.mx()
        .args(&["status"])
        .passes()
        .stdout_has("20260116_093000")
        .stdout_has("RUNNING")
        .stdout_has("400 / 1200 found (33%)");
}

#[test]
fn json_output_is_the_record() {
    let ws = Workspace::new();
    ws.write("gmail-exports/progress.json", RUNNING);

    let run = ws.mx().args(&["status", "--json"]).passes();
    let record = run.stdout_json();

    assert_eq!(record["status"], "RUNNING");
    assert_eq!(record["emails_processed"], 400);
    assert_eq!(record["emails_found"], 1200);
}

#[test]
fn prefix_override_moves_the_record() {
    let ws = Workspace::new();
    ws.write("mail/progress.json", RUNNING);

    ws.mx().args(&["status"]).fails().code(1);
    ws.mx().env("MX_PREFIX", "mail").args(&["status"]).passes().stdout_has("RUNNING");
}
