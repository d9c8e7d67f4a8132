//! Raw settings
//!
//! Settings arrive from three layers, later layers winning: an optional YAML
//! file, environment variables and command-line flags. Every value stays a
//! string here; parsing and required-key checks happen in
//! [`validation`](super::validation) so all problems are reported together.

use crate::Result;
use clap::Args;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Unvalidated settings shared by every subcommand
#[derive(Debug, Clone, Default, Args, Deserialize)]
pub struct Settings {
    /// Repository owner (user or organization)
    #[arg(long, env = "GITHUB_OWNER")]
    #[serde(default)]
    pub github_owner: Option<String>,

    /// Repository name
    #[arg(long, env = "GITHUB_REPO")]
    #[serde(default)]
    pub github_repo: Option<String>,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    #[serde(default)]
    pub github_token: Option<String>,

    /// GitHub REST API base URL (default: https://api.github.com)
    #[arg(long, env = "GITHUB_API_URL")]
    #[serde(default)]
    pub github_api_url: Option<String>,

    /// Jira project key for created tickets
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    #[serde(default)]
    pub jira_project_key: Option<String>,

    /// Jira issue type name for created tickets
    #[arg(long, env = "JIRA_ISSUE_TYPE")]
    #[serde(default)]
    pub jira_issue_type: Option<String>,

    /// Jira hostname (e.g. acme.atlassian.net)
    #[arg(long, env = "JIRA_HOSTNAME")]
    #[serde(default)]
    pub jira_hostname: Option<String>,

    /// Jira API token, or a pre-encoded credential with --jira-auth-scheme token
    #[arg(long, env = "JIRA_AUTH_TOKEN", hide_env_values = true)]
    #[serde(default)]
    pub jira_auth_token: Option<String>,

    /// Jira account email (basic scheme)
    #[arg(long, env = "JIRA_AUTH_EMAIL")]
    #[serde(default)]
    pub jira_auth_email: Option<String>,

    /// Jira auth scheme: basic or token (default: basic when an email is set)
    #[arg(long, env = "JIRA_AUTH_SCHEME")]
    #[serde(default)]
    pub jira_auth_scheme: Option<String>,

    /// Custom field storing the GitHub issue URL (default: customfield_10016)
    #[arg(long, env = "JIRA_BACKREF_FIELD")]
    #[serde(default)]
    pub jira_backref_field: Option<String>,

    /// Access-gateway client id
    #[arg(long, env = "CF_ACCESS_CLIENT_ID")]
    #[serde(default)]
    pub edge_client_id: Option<String>,

    /// Access-gateway client secret
    #[arg(long, env = "CF_ACCESS_CLIENT_SECRET", hide_env_values = true)]
    #[serde(default)]
    pub edge_client_secret: Option<String>,

    /// Label that marks an issue as ready to mirror
    #[arg(long, env = "ACCEPTED_LABEL")]
    #[serde(default)]
    pub accepted_label: Option<String>,

    /// Label that marks an issue as already mirrored
    #[arg(long, env = "SYNCED_LABEL")]
    #[serde(default)]
    pub synced_label: Option<String>,

    #[arg(skip)]
    #[serde(default, deserialize_with = "string_or_number")]
    pub issue_number: Option<String>,

    #[arg(skip)]
    #[serde(default)]
    pub since: Option<String>,

    #[arg(skip)]
    #[serde(default, deserialize_with = "string_or_number")]
    pub lookback_hours: Option<String>,

    #[arg(skip)]
    #[serde(default, deserialize_with = "string_or_number")]
    pub per_page: Option<String>,
}

/// Accept `per_page: 50` as well as `per_page: "50"` in YAML
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::IssueMirrorError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), "Loading settings file");

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Load the file at `path`, or the default file when it exists.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Default settings path (`<config dir>/issue-mirror/config.yaml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("issue-mirror");
            path.push("config.yaml");
            path
        })
    }

    /// Layer `upper` on top of `self`; values set in `upper` win
    pub fn overlay(self, upper: Settings) -> Settings {
        Settings {
            github_owner: upper.github_owner.or(self.github_owner),
            github_repo: upper.github_repo.or(self.github_repo),
            github_token: upper.github_token.or(self.github_token),
            github_api_url: upper.github_api_url.or(self.github_api_url),
            jira_project_key: upper.jira_project_key.or(self.jira_project_key),
            jira_issue_type: upper.jira_issue_type.or(self.jira_issue_type),
            jira_hostname: upper.jira_hostname.or(self.jira_hostname),
            jira_auth_token: upper.jira_auth_token.or(self.jira_auth_token),
            jira_auth_email: upper.jira_auth_email.or(self.jira_auth_email),
            jira_auth_scheme: upper.jira_auth_scheme.or(self.jira_auth_scheme),
            jira_backref_field: upper.jira_backref_field.or(self.jira_backref_field),
            edge_client_id: upper.edge_client_id.or(self.edge_client_id),
            edge_client_secret: upper.edge_client_secret.or(self.edge_client_secret),
            accepted_label: upper.accepted_label.or(self.accepted_label),
            synced_label: upper.synced_label.or(self.synced_label),
            issue_number: upper.issue_number.or(self.issue_number),
            since: upper.since.or(self.since),
            lookback_hours: upper.lookback_hours.or(self.lookback_hours),
            per_page: upper.per_page.or(self.per_page),
        }
    }
}
