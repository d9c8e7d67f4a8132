//! Error types for issue-mirror
//!
//! One error enum covers every failure mode of a sync run. Configuration and
//! read errors abort the run; per-issue create failures in batch mode are
//! converted into report entries by the caller and never surface here.

use thiserror::Error;

/// Result type alias for issue-mirror operations
pub type Result<T> = std::result::Result<T, IssueMirrorError>;

/// Comprehensive error type for issue-mirror operations
#[derive(Error, Debug)]
pub enum IssueMirrorError {
    /// Missing or malformed required setting
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success status or unreachable remote (GitHub or Jira)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Issue not found
    #[error("Issue not found: {0}")]
    NotFound(String),

    /// Adding the synced label failed after a successful create
    #[error("Label write failed: {0}")]
    LabelWrite(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl IssueMirrorError {
    /// Process exit code for a fatal error: 2 for configuration, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            IssueMirrorError::Config(_) | IssueMirrorError::Yaml(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(IssueMirrorError::Config("x".into()).exit_code(), 2);
        assert_eq!(IssueMirrorError::Transport("x".into()).exit_code(), 1);
        assert_eq!(IssueMirrorError::NotFound("x".into()).exit_code(), 1);
        assert_eq!(IssueMirrorError::LabelWrite("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_display_includes_category() {
        let err = IssueMirrorError::NotFound("acme/widgets#42".to_string());
        assert_eq!(err.to_string(), "Issue not found: acme/widgets#42");

        let err = IssueMirrorError::Config("GITHUB_OWNER not set".to_string());
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
