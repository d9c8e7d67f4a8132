//! Mirror orchestration
//!
//! Drives one run in either mode. Single-issue mode gates, creates and labels
//! one issue; any create failure is fatal. Batch mode submits every issue
//! that passes the gate, partitions the results, and labels only the
//! successes. A failing issue never stops the rest of the batch.
//!
//! Label writes are best effort in both modes. A ticket whose label write
//! failed will be mirrored again by the next run.

use super::backref::parse_issue_number;
use super::gate::{evaluate, GateDecision, SkipReason};
use super::model::{CreatedIssue, CreationResult, DraftIssue, FailedIssue, SourceIssue};
use super::translate::translate;
use super::{IssueSink, IssueSource};
use crate::config::{BatchWindow, LabelConfig, RunConfig};
use crate::{IssueMirrorError, Result};
use std::fmt;
use tracing::{debug, info, warn};

/// Per-run settings for the mirror
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub labels: LabelConfig,
    pub project_key: String,
    pub issue_type: String,

    /// Gate and translate, but create nothing and write no labels
    pub dry_run: bool,
}

impl MirrorOptions {
    pub fn new(
        labels: LabelConfig,
        project_key: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Self {
        Self {
            labels,
            project_key: project_key.into(),
            issue_type: issue_type.into(),
            dry_run: false,
        }
    }

    /// Options for a validated run configuration
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.labels.clone(),
            config.jira.project.clone(),
            config.jira.issue_type.clone(),
        )
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// Result of single-issue mode
#[derive(Debug, Clone)]
pub enum SingleOutcome {
    /// The gate declined the issue
    Skipped(SkipReason),

    /// Dry run: the draft that would have been submitted
    DryRun(DraftIssue),

    /// Ticket created; `label_written` is false when the synced label could not be added
    Mirrored { key: String, label_written: bool },
}

/// An issue the gate declined in batch mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedIssue {
    pub number: u64,
    pub reason: SkipReason,
}

/// A created ticket whose source issue could not be labelled
#[derive(Debug, Clone)]
pub struct LabelFailure {
    pub key: String,
    pub back_reference: Option<String>,
    pub error: String,
}

/// Result of batch mode
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Issues returned by the tracker query
    pub fetched: usize,

    pub skipped: Vec<SkippedIssue>,

    /// Drafts Jira accepted
    pub created: Vec<CreatedIssue>,

    /// Drafts Jira did not accept
    pub failed: Vec<FailedIssue>,

    /// Issue numbers that received the synced label
    pub labelled: Vec<u64>,

    pub label_failures: Vec<LabelFailure>,

    /// Drafts built during a dry run
    pub dry_run: Vec<DraftIssue>,
}

impl BatchReport {
    /// Nothing matched the query
    pub fn is_empty(&self) -> bool {
        self.fetched == 0
    }

    /// Whether any create or label write failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.label_failures.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fetched, {} skipped, {} created, {} failed, {} labelled, {} label failures",
            self.fetched,
            self.skipped.len(),
            self.created.len(),
            self.failed.len(),
            self.labelled.len(),
            self.label_failures.len()
        )?;
        if !self.dry_run.is_empty() {
            write!(f, ", {} drafted (dry run)", self.dry_run.len())?;
        }
        Ok(())
    }
}

/// Mirrors accepted issues from an [`IssueSource`] into an [`IssueSink`]
pub struct Mirror<S, K> {
    source: S,
    sink: K,
    options: MirrorOptions,
}

impl<S: IssueSource, K: IssueSink> Mirror<S, K> {
    pub fn new(source: S, sink: K, options: MirrorOptions) -> Self {
        Self {
            source,
            sink,
            options,
        }
    }

    /// Build the Jira draft for an issue
    pub fn draft_for(&self, issue: &SourceIssue, with_back_reference: bool) -> DraftIssue {
        DraftIssue {
            project_key: self.options.project_key.clone(),
            summary: issue.title.clone(),
            description: translate(issue),
            issue_type: self.options.issue_type.clone(),
            back_reference: with_back_reference.then(|| issue.url.clone()),
        }
    }

    fn gate(&self, issue: &SourceIssue) -> GateDecision {
        let decision = evaluate(
            issue,
            &self.options.labels.accepted,
            &self.options.labels.synced,
        );
        match decision {
            GateDecision::Skip(SkipReason::AlreadySynced) => info!(
                number = issue.number,
                label = %self.options.labels.synced,
                "Issue already marked as synced, skipping"
            ),
            GateDecision::Skip(SkipReason::NotAccepted) => info!(
                number = issue.number,
                label = %self.options.labels.accepted,
                "Issue not marked as ready for syncing, skipping"
            ),
            GateDecision::Mirror => debug!(number = issue.number, "Issue passes sync gate"),
        }
        decision
    }

    /// Sync one issue by number
    pub async fn sync_one(&self, number: u64) -> Result<SingleOutcome> {
        let issue = self.source.fetch_issue(number).await?;

        if let GateDecision::Skip(reason) = self.gate(&issue) {
            return Ok(SingleOutcome::Skipped(reason));
        }

        let draft = self.draft_for(&issue, false);

        if self.options.dry_run {
            info!(number = number, summary = %draft.summary, "Dry run: would create JIRA issue");
            return Ok(SingleOutcome::DryRun(draft));
        }

        let created = match self.sink.create(draft).await {
            CreationResult::Created(created) => created,
            CreationResult::Failed(failed) => {
                return Err(IssueMirrorError::Transport(format!(
                    "error creating JIRA issue for #{}: {}",
                    number, failed.error
                )));
            }
        };

        let label_written = self.commit_label(number).await.is_ok();

        Ok(SingleOutcome::Mirrored {
            key: created.ticket.key,
            label_written,
        })
    }

    /// Sync every accepted issue in the window.
    ///
    /// Only the fetch can fail the run; per-issue problems land in the report.
    pub async fn sync_batch(&self, window: &BatchWindow) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        let issues = self
            .source
            .fetch_labelled(&self.options.labels.accepted, window)
            .await?;
        report.fetched = issues.len();

        if issues.is_empty() {
            info!(since = %window.since, "No recently accepted issues, nothing to do");
            return Ok(report);
        }

        info!(count = issues.len(), since = %window.since, "Fetched accepted issues");

        let mut results = Vec::new();
        for issue in &issues {
            if let GateDecision::Skip(reason) = self.gate(issue) {
                report.skipped.push(SkippedIssue {
                    number: issue.number,
                    reason,
                });
                continue;
            }

            let draft = self.draft_for(issue, true);
            if self.options.dry_run {
                info!(number = issue.number, summary = %draft.summary, "Dry run: would create JIRA issue");
                report.dry_run.push(draft);
                continue;
            }

            results.push(self.sink.create(draft).await);
        }

        let (created, failed) = CreationResult::partition(results);
        report.created = created;
        report.failed = failed;

        for created in &report.created {
            match self.commit_created(created).await {
                Ok(number) => report.labelled.push(number),
                Err(e) => report.label_failures.push(LabelFailure {
                    key: created.ticket.key.clone(),
                    back_reference: created.draft.back_reference.clone(),
                    error: e.to_string(),
                }),
            }
        }

        for failed in &report.failed {
            warn!(
                back_reference = ?failed.draft.back_reference,
                error = %failed.error,
                "Failed to create JIRA issue"
            );
        }

        info!("Batch sync complete: {}", report);

        Ok(report)
    }

    /// Label the source issue of a created ticket, found via its back-reference
    async fn commit_created(&self, created: &CreatedIssue) -> Result<u64> {
        let number = match created.draft.back_reference {
            Some(ref url) => parse_issue_number(url),
            None => Err(IssueMirrorError::LabelWrite(format!(
                "{} has no back-reference",
                created.ticket.key
            ))),
        };
        if let Err(ref e) = number {
            warn!(key = %created.ticket.key, error = %e, "Cannot label source issue");
        }
        let number = number?;

        self.commit_label(number).await?;
        Ok(number)
    }

    /// Add the synced label; failures are logged and returned, never retried
    async fn commit_label(&self, number: u64) -> Result<()> {
        let synced = &self.options.labels.synced;
        match self.source.add_label(number, synced).await {
            Ok(()) => {
                info!(number = number, label = %synced, "Marked issue as synced");
                Ok(())
            }
            Err(e) => {
                warn!(
                    number = number,
                    label = %synced,
                    error = %e,
                    "Error adding synced label; issue may be mirrored again on the next run"
                );
                Err(match e {
                    IssueMirrorError::LabelWrite(_) => e,
                    other => IssueMirrorError::LabelWrite(other.to_string()),
                })
            }
        }
    }
}
