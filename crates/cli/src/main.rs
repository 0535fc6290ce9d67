// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mx - durable, resumable mailbox export

mod commands;
mod env;
mod exit_error;
mod logging;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mx", version, about = "Durable, resumable mailbox export")]
struct Cli {
    /// Also write logs to this file (overrides MX_LOG_FILE)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the mailbox, resuming an interrupted run with the same flags
    Export(commands::export::ExportArgs),
    /// Show the last progress record
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                eprintln!("error: {}", exit.message);
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("error: {e:#}");
                std::process::exit(exit_error::EXIT_ABORTED);
            }
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_file = cli.log_file.or_else(env::log_file);
    let _guard = logging::init(&env::log_filter(), log_file.as_deref())?;

    match cli.command {
        Commands::Export(args) => commands::export::handle(args).await,
        Commands::Status(args) => commands::status::handle(args).await,
    }
}
