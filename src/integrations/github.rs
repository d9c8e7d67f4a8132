//! GitHub Issues Integration Adapter
//!
//! Reads issues and writes labels through the GitHub REST API.

use crate::config::{BatchWindow, GitHubIntegration};
use crate::sync::{IssueSource, SourceIssue};
use crate::{IssueMirrorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const USER_AGENT: &str = concat!("issue-mirror/", env!("CARGO_PKG_VERSION"));
const PUBLIC_API_URL: &str = "https://api.github.com";

/// GitHub API client
pub struct GitHubAdapter {
    client: Client,
    config: GitHubIntegration,
    rest_base_url: String,
}

/// GitHub issue (REST API format)
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    pub html_url: String,
    pub updated_at: DateTime<Utc>,
    /// Present when the "issue" is really a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl From<GitHubIssue> for SourceIssue {
    fn from(issue: GitHubIssue) -> Self {
        SourceIssue {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            url: issue.html_url,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            updated_at: issue.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLabel {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
struct AddLabelsRequest<'a> {
    labels: &'a [String],
}

impl GitHubAdapter {
    /// Create a new GitHub adapter
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GitHubIntegration) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static(USER_AGENT),
                );
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/vnd.github+json"),
                );
                headers
            })
            .build()?;

        let rest_base_url = Self::rest_base_url_for(&config.url);

        Ok(Self {
            client,
            config,
            rest_base_url,
        })
    }

    /// REST base URL for the configured API URL.
    ///
    /// The value is the REST base as exported by Actions runners
    /// (`https://api.github.com`, or `https://HOST/api/v3` on Enterprise) and
    /// is used as-is. Only the public web host `github.com` is mapped to the API host.
    pub fn rest_base_url_for(url: &str) -> String {
        let base_url = url.trim().trim_end_matches('/');
        let is_public_web_host = Url::parse(base_url)
            .map(|parsed| {
                matches!(parsed.host_str(), Some("github.com") | Some("www.github.com"))
                    && matches!(parsed.path(), "" | "/")
            })
            .unwrap_or(false);

        if is_public_web_host {
            PUBLIC_API_URL.to_string()
        } else {
            base_url.to_string()
        }
    }

    pub fn repository(&self) -> String {
        self.config.full_name()
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.rest_base_url, self.config.owner, self.config.repo
        )
    }

    async fn error_for(response: reqwest::Response, context: &str) -> IssueMirrorError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                IssueMirrorError::Transport("GitHub authentication failed".to_string())
            }
            StatusCode::FORBIDDEN => {
                IssueMirrorError::Transport("GitHub API forbidden (rate limit?)".to_string())
            }
            _ => {
                let error_body = response.text().await.unwrap_or_default();
                IssueMirrorError::Transport(format!(
                    "{}: HTTP {}: {}",
                    context, status, error_body
                ))
            }
        }
    }

    /// Get a single issue by number
    pub async fn get_issue(&self, number: u64) -> Result<GitHubIssue> {
        let url = format!("{}/{}", self.issues_url(), number);

        debug!(repo = %self.repository(), number = %number, "Fetching GitHub issue");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| IssueMirrorError::Transport(format!("GitHub unreachable: {}", e)))?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(IssueMirrorError::NotFound(format!(
                "{}#{}",
                self.repository(),
                number
            ))),
            _ => Err(Self::error_for(response, "GitHub API error").await),
        }
    }

    /// List open issues carrying `label` updated since `since`, newest first.
    ///
    /// Pull requests share the issues endpoint and are dropped.
    pub async fn list_issues(
        &self,
        label: &str,
        since: DateTime<Utc>,
        per_page: u8,
    ) -> Result<Vec<GitHubIssue>> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let params = [
            ("labels", label.to_string()),
            ("since", since.clone()),
            ("state", "open".to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", per_page.to_string()),
        ];

        debug!(repo = %self.repository(), label = %label, since = %since, per_page = %per_page, "Listing GitHub issues");

        let response = self
            .client
            .get(self.issues_url())
            .query(&params)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| IssueMirrorError::Transport(format!("GitHub unreachable: {}", e)))?;

        match response.status() {
            StatusCode::OK => {
                let issues: Vec<GitHubIssue> = response.json().await?;
                let returned = issues.len();
                let mut issues: Vec<GitHubIssue> =
                    issues.into_iter().filter(|i| !i.is_pull_request()).collect();
                issues.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                info!(
                    returned = returned,
                    issues = issues.len(),
                    "GitHub issue listing complete"
                );
                Ok(issues)
            }
            _ => Err(Self::error_for(response, "GitHub API error").await),
        }
    }

    /// Add labels to an issue
    pub async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let url = format!("{}/{}/labels", self.issues_url(), number);

        info!(repo = %self.repository(), number = %number, labels = ?labels, "Adding labels to GitHub issue");

        let response = self
            .client
            .post(&url)
            .json(&AddLabelsRequest { labels })
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| IssueMirrorError::LabelWrite(format!("GitHub unreachable: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(IssueMirrorError::LabelWrite(format!(
                "{}#{}: HTTP {}: {}",
                self.repository(),
                number,
                status,
                error_body
            )))
        }
    }
}

#[async_trait]
impl IssueSource for GitHubAdapter {
    async fn fetch_issue(&self, number: u64) -> Result<SourceIssue> {
        Ok(self.get_issue(number).await?.into())
    }

    async fn fetch_labelled(&self, label: &str, window: &BatchWindow) -> Result<Vec<SourceIssue>> {
        let issues = self.list_issues(label, window.since, window.per_page).await?;
        Ok(issues.into_iter().map(SourceIssue::from).collect())
    }

    async fn add_label(&self, number: u64, label: &str) -> Result<()> {
        self.add_labels(number, &[label.to_string()]).await
    }
}
