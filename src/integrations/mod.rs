//! External Integrations
//!
//! REST adapters for the two systems a run talks to.
//!
//! - **GitHub**: source of issues, and where the `synced` label is written back
//! - **JIRA**: destination where mirrored tickets are created

pub mod github;
pub mod jira;

// GitHub exports
pub use github::{GitHubAdapter, GitHubIssue, GitHubLabel};

// JIRA exports
pub use jira::{
    JiraAdapter, JiraFieldValue, JiraIssueTypeRef, JiraProjectRef, NewJiraFields, NewJiraIssue,
};
