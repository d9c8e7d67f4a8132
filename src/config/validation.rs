//! Settings validation
//!
//! Turns raw [`Settings`] into a [`RunConfig`], checking:
//! - Required keys are present and non-empty
//! - Numbers and timestamps parse
//! - The Jira auth scheme has what it needs
//! - Edge-access credentials come in pairs
//!
//! Every problem is collected so a misconfigured CI job sees all of them at once.

use super::integration::{
    EdgeAccess, GitHubIntegration, JiraAuth, JiraIntegration, LabelConfig, DEFAULT_BACKREF_FIELD,
};
use super::settings::Settings;
use crate::IssueMirrorError;
use chrono::{DateTime, Duration, Utc};

/// GitHub's REST API caps `per_page` at 100
pub const MAX_PER_PAGE: u8 = 100;

/// Default batch page size
pub const DEFAULT_PER_PAGE: u8 = 100;

/// Default look-back window when no `since` is given
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult<T> = std::result::Result<T, Vec<ValidationError>>;

/// Which entry point is being configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Sync one issue by number
    Single,
    /// Sync every accepted issue updated since the watermark
    Batch,
}

/// Query window for batch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchWindow {
    /// Watermark: only issues updated at or after this instant
    pub since: DateTime<Utc>,

    /// Upper bound on issues fetched in one run
    pub per_page: u8,
}

/// What a run operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTarget {
    Single(u64),
    Batch(BatchWindow),
}

/// Fully validated configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub github: GitHubIntegration,
    pub jira: JiraIntegration,
    pub labels: LabelConfig,
    pub target: RunTarget,
}

/// Collects errors while pulling values out of [`Settings`]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    /// A required, non-blank string; the env var name is reported when missing
    fn required(&mut self, env_name: &str, value: &Option<String>) -> String {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.errors
                    .push(ValidationError::new(env_name, format!("{} not set", env_name)));
                String::new()
            }
        }
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message));
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate settings for the given mode.
///
/// `now` anchors the default batch watermark; it is passed in rather than
/// read from the clock so the window is an explicit input to the query.
pub fn validate_settings(
    settings: &Settings,
    mode: RunMode,
    now: DateTime<Utc>,
) -> ValidationResult<RunConfig> {
    let mut c = Collector { errors: Vec::new() };

    let github = GitHubIntegration {
        url: optional(&settings.github_api_url).unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string()),
        owner: c.required("GITHUB_OWNER", &settings.github_owner),
        repo: c.required("GITHUB_REPO", &settings.github_repo),
        token: c.required("GITHUB_TOKEN", &settings.github_token),
    };

    let project = c.required("JIRA_PROJECT_KEY", &settings.jira_project_key);
    let issue_type = c.required("JIRA_ISSUE_TYPE", &settings.jira_issue_type);
    let hostname = c.required("JIRA_HOSTNAME", &settings.jira_hostname);
    let auth = validate_auth(&mut c, settings);
    let edge_access = validate_edge_access(&mut c, settings);

    let jira = JiraIntegration {
        url: JiraIntegration::base_url_for(&hostname),
        project,
        issue_type,
        backref_field: optional(&settings.jira_backref_field)
            .unwrap_or_else(|| DEFAULT_BACKREF_FIELD.to_string()),
        auth,
        edge_access,
    };

    let labels = LabelConfig::new(
        c.required("ACCEPTED_LABEL", &settings.accepted_label),
        c.required("SYNCED_LABEL", &settings.synced_label),
    );
    if !labels.accepted.is_empty() && labels.accepted == labels.synced {
        c.error(
            "SYNCED_LABEL",
            "accepted and synced labels must differ, or every accepted issue counts as synced",
        );
    }

    let target = match mode {
        RunMode::Single => RunTarget::Single(validate_issue_number(&mut c, settings)),
        RunMode::Batch => RunTarget::Batch(validate_window(&mut c, settings, now)),
    };

    if c.errors.is_empty() {
        Ok(RunConfig {
            github,
            jira,
            labels,
            target,
        })
    } else {
        Err(c.errors)
    }
}

/// Validate settings and fold any errors into one configuration error
pub fn validate_config_result(
    settings: &Settings,
    mode: RunMode,
    now: DateTime<Utc>,
) -> crate::Result<RunConfig> {
    validate_settings(settings, mode, now).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        IssueMirrorError::Config(messages.join("; "))
    })
}

fn validate_auth(c: &mut Collector, settings: &Settings) -> JiraAuth {
    let token = c.required("JIRA_AUTH_TOKEN", &settings.jira_auth_token);
    let email = optional(&settings.jira_auth_email);

    let scheme = optional(&settings.jira_auth_scheme)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| {
            if email.is_some() {
                "basic".to_string()
            } else {
                "token".to_string()
            }
        });

    match scheme.as_str() {
        "basic" => match email {
            Some(email) => JiraAuth::Basic { email, token },
            None => {
                c.error("JIRA_AUTH_EMAIL", "JIRA_AUTH_EMAIL not set (required for basic auth)");
                JiraAuth::Token { token }
            }
        },
        "token" => JiraAuth::Token { token },
        other => {
            c.error(
                "JIRA_AUTH_SCHEME",
                format!("unknown auth scheme '{}'. Must be one of: basic, token", other),
            );
            JiraAuth::Token { token }
        }
    }
}

fn validate_edge_access(c: &mut Collector, settings: &Settings) -> Option<EdgeAccess> {
    match (
        optional(&settings.edge_client_id),
        optional(&settings.edge_client_secret),
    ) {
        (Some(client_id), Some(client_secret)) => Some(EdgeAccess {
            client_id,
            client_secret,
        }),
        (None, None) => None,
        (Some(_), None) => {
            c.error("CF_ACCESS_CLIENT_SECRET", "client id set without a client secret");
            None
        }
        (None, Some(_)) => {
            c.error("CF_ACCESS_CLIENT_ID", "client secret set without a client id");
            None
        }
    }
}

fn validate_issue_number(c: &mut Collector, settings: &Settings) -> u64 {
    let raw = c.required("GITHUB_ISSUE_NUMBER", &settings.issue_number);
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => n,
        _ => {
            c.error(
                "GITHUB_ISSUE_NUMBER",
                format!("'{}' is not a positive issue number", raw),
            );
            0
        }
    }
}

fn validate_window(c: &mut Collector, settings: &Settings, now: DateTime<Utc>) -> BatchWindow {
    let per_page = match optional(&settings.per_page) {
        None => DEFAULT_PER_PAGE,
        Some(raw) => match raw.parse::<u8>() {
            Ok(n) if (1..=MAX_PER_PAGE).contains(&n) => n,
            _ => {
                c.error(
                    "PER_PAGE",
                    format!("'{}' must be a number between 1 and {}", raw, MAX_PER_PAGE),
                );
                DEFAULT_PER_PAGE
            }
        },
    };

    let since = match optional(&settings.since) {
        Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                c.error("SINCE", format!("'{}' is not an RFC 3339 timestamp: {}", raw, e));
                now
            }
        },
        None => {
            let hours = match optional(&settings.lookback_hours) {
                None => DEFAULT_LOOKBACK_HOURS,
                Some(raw) => match raw.parse::<u32>() {
                    Ok(h) if h > 0 => h,
                    _ => {
                        c.error(
                            "LOOKBACK_HOURS",
                            format!("'{}' is not a positive number of hours", raw),
                        );
                        DEFAULT_LOOKBACK_HOURS
                    }
                },
            };
            match now.checked_sub_signed(Duration::hours(i64::from(hours))) {
                Some(since) => since,
                None => {
                    c.error("LOOKBACK_HOURS", format!("{} hours reaches past the calendar", hours));
                    now
                }
            }
        }
    };

    BatchWindow { since, per_page }
}
