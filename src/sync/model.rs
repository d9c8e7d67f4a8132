//! Sync data model
//!
//! [`SourceIssue`] is what the tracker hands us, [`DraftIssue`] is what we
//! ask Jira to create, and [`CreationResult`] is what came back.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;

/// An issue read from the upstream tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIssue {
    /// Issue number, unique per repository
    pub number: u64,
    pub title: String,
    /// Markdown body; empty when the issue has none
    pub body: String,
    /// Canonical web link to the issue
    pub url: String,
    pub labels: HashSet<String>,
    pub updated_at: DateTime<Utc>,
}

impl SourceIssue {
    /// Whether the issue carries `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// A Jira ticket that has not been created yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftIssue {
    pub project_key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    /// Source issue URL, stored on the ticket so a result can be traced back
    pub back_reference: Option<String>,
}

/// Minimal body of a successful Jira create response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTicket {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// A draft that Jira accepted
#[derive(Debug, Clone)]
pub struct CreatedIssue {
    pub draft: DraftIssue,
    pub ticket: CreatedTicket,
}

/// A draft that Jira did not accept, kept for logging and back-reference
#[derive(Debug, Clone)]
pub struct FailedIssue {
    pub draft: DraftIssue,
    pub error: String,
}

/// Outcome of submitting one draft
#[derive(Debug, Clone)]
pub enum CreationResult {
    Created(CreatedIssue),
    Failed(FailedIssue),
}

impl CreationResult {
    /// Split results into successes and failures, keeping submission order
    pub fn partition(results: Vec<CreationResult>) -> (Vec<CreatedIssue>, Vec<FailedIssue>) {
        let mut created = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            match result {
                CreationResult::Created(c) => created.push(c),
                CreationResult::Failed(f) => failed.push(f),
            }
        }
        (created, failed)
    }
}
