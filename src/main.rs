//! issue-mirror - mirror accepted GitHub issues into Jira
//!
//! Main entry point for the issue-mirror CLI.

use clap::Parser;
use issue_mirror::commands::{exit_status, run, Cli};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = issue_mirror::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = run(cli).await;
    if let Err(ref e) = result {
        tracing::error!(error = %e, "Sync run failed");
        eprintln!("Error: {}", e);
    }

    process::exit(exit_status(&result));
}
