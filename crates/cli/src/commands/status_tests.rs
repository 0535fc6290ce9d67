// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;
use mx_core::test_support::progress;
use mx_core::ProgressStatus;
use yare::parameterized;

#[parameterized(
    seconds = { 42, "42s" },
    minutes = { 125, "2m" },
    hours = { 7_200, "2h" },
    days = { 259_200, "3d" },
    future = { -5, "0s" },
)]
fn ago(secs: i64, expected: &str) {
    let then = Utc::now();
    assert_eq!(format_ago(then, then + Duration::seconds(secs)), expected);
}

#[test]
fn renders_running_record() {
    let record = progress("20260116_093000", 400, 1200, ProgressStatus::Running);
    let now = record.last_updated + Duration::minutes(5);

    let text = render(&record, now);

    assert_eq!(
        text,
        "Run:        20260116_093000\n\
         Status:     RUNNING\n\
         Processed:  400 / 1200 found (33%)\n\
         Updated:    2026-01-16T09:30:00Z (5m ago)\n\
         Raw path:   file:///exports/gmail-exports/raw/20260116_093000/\n"
    );
}

#[test]
fn empty_run_has_no_percentage() {
    let record = progress("20260116_093000", 0, 0, ProgressStatus::Complete);
    let text = render(&record, record.last_updated);
    assert!(text.contains("Processed:  0 / 0 found\n"), "{text}");
    assert!(text.contains("Status:     COMPLETE"), "{text}");
}
