// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("export").stdout_has("status");
}

#[test]
fn export_help_lists_job_flags() {
    cli()
        .args(&["export", "--help"])
        .passes()
        .stdout_has("--query")
        .stdout_has("--max-items")
        .stdout_has("--workers")
        .stdout_has("--batch-size")
        .stdout_has("--page-size");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn missing_command_is_a_usage_error() {
    cli().fails().code(2);
}
