//! CLI command definitions
//!
//! The clap structs for both entry points, plus the run loop that turns a
//! parsed command line into a sync run and a process exit status.

use crate::config::{validate_config_result, RunConfig, RunMode, RunTarget, Settings};
use crate::integrations::{GitHubAdapter, JiraAdapter};
use crate::sync::{Mirror, MirrorOptions, SingleOutcome};
use crate::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

/// Mirror accepted GitHub issues into Jira
#[derive(Parser, Debug)]
#[command(name = "issue-mirror")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML settings file (default: <config dir>/issue-mirror/config.yaml)
    #[arg(short, long, global = true, env = "ISSUE_MIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Gate and translate, but create no tickets and write no labels
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync one issue by number
    Issue {
        /// Issue number
        #[arg(env = "GITHUB_ISSUE_NUMBER")]
        number: Option<String>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Sync every accepted issue updated since a watermark
    Batch {
        /// Only issues updated at or after this RFC 3339 timestamp
        #[arg(long, env = "SINCE")]
        since: Option<String>,

        /// Watermark as hours before now, when --since is not given (default: 24)
        #[arg(long, env = "LOOKBACK_HOURS")]
        lookback_hours: Option<String>,

        /// Maximum issues fetched, 1-100 (default: 100)
        #[arg(long, env = "PER_PAGE")]
        per_page: Option<String>,

        #[command(flatten)]
        settings: Settings,
    },
}

impl Commands {
    /// Mode plus command-line settings with the subcommand values folded in
    pub fn into_settings(self) -> (RunMode, Settings) {
        match self {
            Commands::Issue {
                number,
                mut settings,
            } => {
                settings.issue_number = number;
                (RunMode::Single, settings)
            }
            Commands::Batch {
                since,
                lookback_hours,
                per_page,
                mut settings,
            } => {
                settings.since = since;
                settings.lookback_hours = lookback_hours;
                settings.per_page = per_page;
                (RunMode::Batch, settings)
            }
        }
    }
}

/// Process exit status for the result of a run
pub fn exit_status(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.exit_code(),
    }
}

/// Layer the settings file under the command line, validate, and sync
pub async fn run(cli: Cli) -> Result<()> {
    let file_settings = Settings::load_optional(cli.config.as_deref())?;
    let (mode, cli_settings) = cli.command.into_settings();
    let settings = file_settings.overlay(cli_settings);

    let config = validate_config_result(&settings, mode, Utc::now())?;

    info!(
        repo = %config.github.full_name(),
        project = %config.jira.project,
        dry_run = cli.dry_run,
        "Configuration loaded"
    );

    execute(&config, cli.dry_run).await
}

/// Run one sync for a validated configuration and print the outcome.
///
/// Skips, an empty batch and per-issue create failures in batch mode are
/// all `Ok`. Only fatal errors come back as `Err`.
pub async fn execute(config: &RunConfig, dry_run: bool) -> Result<()> {
    let mirror = build_mirror(config, dry_run)?;
    let repo = config.github.full_name();

    match config.target {
        RunTarget::Single(number) => match mirror.sync_one(number).await? {
            SingleOutcome::Skipped(reason) => {
                println!("Skipped {}#{}: {}", repo, number, reason);
            }
            SingleOutcome::DryRun(draft) => {
                println!("Would create {} issue: {}", draft.project_key, draft.summary);
            }
            SingleOutcome::Mirrored { key, label_written } => {
                println!("Successfully created JIRA issue {} from {}#{}", key, repo, number);
                if !label_written {
                    println!(
                        "Warning: could not add '{}' label; the next run may mirror it again",
                        config.labels.synced
                    );
                }
            }
        },
        RunTarget::Batch(window) => {
            let report = mirror.sync_batch(&window).await?;
            if report.is_empty() {
                println!("No accepted issues updated since {}", window.since);
                return Ok(());
            }
            for created in &report.created {
                println!(
                    "Created {} from {}",
                    created.ticket.key,
                    created.draft.back_reference.as_deref().unwrap_or("?")
                );
            }
            for failed in &report.failed {
                println!(
                    "Failed {}: {}",
                    failed.draft.back_reference.as_deref().unwrap_or("?"),
                    failed.error
                );
            }
            if report.has_failures() {
                warn!(
                    failed = report.failed.len(),
                    label_failures = report.label_failures.len(),
                    "Batch finished with failures; affected issues are retried by the next run"
                );
            }
            println!("{}", report);
        }
    }

    Ok(())
}

fn build_mirror(config: &RunConfig, dry_run: bool) -> Result<Mirror<GitHubAdapter, JiraAdapter>> {
    let github = GitHubAdapter::new(config.github.clone())?;
    let jira = JiraAdapter::new(config.jira.clone())?;
    let options = MirrorOptions::from_config(config).with_dry_run(dry_run);
    Ok(Mirror::new(github, jira, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IssueMirrorError;

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&Ok(())), 0);
        assert_eq!(
            exit_status(&Err(IssueMirrorError::Config("GITHUB_OWNER not set".into()))),
            2
        );
        assert_eq!(
            exit_status(&Err(IssueMirrorError::Transport("HTTP 500".into()))),
            1
        );
    }

    #[test]
    fn test_issue_subcommand_parsing() {
        let cli = Cli::try_parse_from([
            "issue-mirror",
            "--dry-run",
            "issue",
            "42",
            "--github-owner",
            "acme",
            "--accepted-label",
            "accepted",
        ])
        .unwrap();
        assert!(cli.dry_run);

        let (mode, settings) = cli.command.into_settings();
        assert_eq!(mode, RunMode::Single);
        assert_eq!(settings.issue_number.as_deref(), Some("42"));
        assert_eq!(settings.github_owner.as_deref(), Some("acme"));
        assert_eq!(settings.accepted_label.as_deref(), Some("accepted"));
    }

    #[test]
    fn test_batch_subcommand_parsing() {
        let cli = Cli::try_parse_from([
            "issue-mirror",
            "batch",
            "--since",
            "2026-03-01T00:00:00Z",
            "--per-page",
            "25",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let (mode, settings) = cli.command.into_settings();
        assert_eq!(mode, RunMode::Batch);
        assert_eq!(settings.since.as_deref(), Some("2026-03-01T00:00:00Z"));
        assert_eq!(settings.per_page.as_deref(), Some("25"));
    }
}
