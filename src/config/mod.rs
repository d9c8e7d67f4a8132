//! Configuration system
//!
//! Loads settings from an optional YAML file, the environment and the
//! command line, then validates them into a [`RunConfig`]:
//! - GitHub repository and token
//! - Jira project, issue type, host and authentication strategy
//! - Accepted/synced label names for the sync gate
//! - Single-issue number or batch query window

mod integration;
mod settings;
pub mod validation;

pub use integration::{
    EdgeAccess, GitHubIntegration, JiraAuth, JiraIntegration, LabelConfig, DEFAULT_BACKREF_FIELD,
};
pub use settings::Settings;
pub use validation::{
    validate_config_result, validate_settings, BatchWindow, RunConfig, RunMode, RunTarget,
    ValidationError,
};
