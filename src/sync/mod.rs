//! Issue mirroring
//!
//! The label protocol that mirrors each accepted GitHub issue into Jira once
//! per label state.
//!
//! # Sync Flow
//!
//! 1. **Read**: fetch one issue, or every accepted issue updated since the watermark
//! 2. **Gate**: skip issues that are already `synced` or not `accepted`
//! 3. **Translate**: build a Jira draft with the body converted to wiki markup
//! 4. **Create**: submit the draft; a failure is recorded, never retried
//! 5. **Commit**: add the `synced` label to every issue whose ticket was created
//!
//! The remote systems sit behind [`IssueSource`] and [`IssueSink`] so the
//! protocol can be exercised without a network.

pub mod backref;
pub mod gate;
pub mod mirror;
mod model;
pub mod translate;

pub use gate::{evaluate, GateDecision, SkipReason};
pub use mirror::{BatchReport, LabelFailure, Mirror, MirrorOptions, SingleOutcome, SkippedIssue};
pub use model::{CreatedIssue, CreatedTicket, CreationResult, DraftIssue, FailedIssue, SourceIssue};

use crate::config::BatchWindow;
use crate::Result;
use async_trait::async_trait;

/// Read side and label write side of the upstream tracker
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch one issue by number
    async fn fetch_issue(&self, number: u64) -> Result<SourceIssue>;

    /// Fetch issues carrying `label` updated within `window`, most recent first
    async fn fetch_labelled(&self, label: &str, window: &BatchWindow) -> Result<Vec<SourceIssue>>;

    /// Add `label` to an issue
    async fn add_label(&self, number: u64, label: &str) -> Result<()>;
}

/// Downstream ticket system
#[async_trait]
pub trait IssueSink: Send + Sync {
    /// Create a ticket from a draft.
    ///
    /// Never fails as a call: every problem is a [`CreationResult::Failed`]
    /// carrying the original draft.
    async fn create(&self, draft: DraftIssue) -> CreationResult;
}
