//! Integration configuration
//!
//! Validated, ready-to-use settings for the two remote systems: the GitHub
//! repository that issues are read from, and the Jira project they are
//! mirrored into.

/// Default custom field holding the GitHub issue URL on the created ticket
pub const DEFAULT_BACKREF_FIELD: &str = "customfield_10016";

/// How the create request authenticates against Jira
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JiraAuth {
    /// HTTP Basic built from the account email and API token
    Basic { email: String, token: String },

    /// Credential that is already encoded, passed through as-is
    Token { token: String },
}

impl JiraAuth {
    /// Value of the `Authorization` header for the pass-through variant.
    ///
    /// A bare token is treated as pre-encoded Basic credentials. A value that
    /// already names its scheme (`Bearer abc`) is sent verbatim.
    pub fn passthrough_header(token: &str) -> String {
        let token = token.trim();
        if token.contains(' ') {
            token.to_string()
        } else {
            format!("Basic {}", token)
        }
    }

    /// Short name used in log lines
    pub fn scheme_name(&self) -> &'static str {
        match self {
            JiraAuth::Basic { .. } => "basic",
            JiraAuth::Token { .. } => "token",
        }
    }
}

/// Service-token headers for a Jira instance behind an access gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeAccess {
    pub client_id: String,
    pub client_secret: String,
}

/// GitHub integration configuration
#[derive(Debug, Clone)]
pub struct GitHubIntegration {
    /// REST API base URL (e.g., "https://api.github.com" or "https://github.example.com/api/v3")
    pub url: String,

    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Access token for REST calls
    pub token: String,
}

impl GitHubIntegration {
    /// `owner/repo`, as used in log lines and error messages
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// JIRA integration configuration
#[derive(Debug, Clone)]
pub struct JiraIntegration {
    /// Base URL of the JIRA instance, always with a scheme
    pub url: String,

    /// JIRA project key
    pub project: String,

    /// Issue type name used for every created ticket
    pub issue_type: String,

    /// Custom field that stores the GitHub issue URL
    pub backref_field: String,

    /// Authentication for the create request
    pub auth: JiraAuth,

    /// Optional access-gateway headers
    pub edge_access: Option<EdgeAccess>,
}

impl JiraIntegration {
    /// Build a base URL from a configured hostname.
    ///
    /// A bare host gets `https://`; an explicit scheme is kept.
    pub fn base_url_for(hostname: &str) -> String {
        let host = hostname.trim().trim_end_matches('/');
        if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// Endpoint for creating issues
    pub fn create_issue_url(&self) -> String {
        format!("{}/rest/api/latest/issue/", self.url.trim_end_matches('/'))
    }
}

/// Label names that drive the sync gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConfig {
    /// Marks an issue as ready to mirror
    pub accepted: String,

    /// Marks an issue as already mirrored
    pub synced: String,
}

impl LabelConfig {
    pub fn new(accepted: impl Into<String>, synced: impl Into<String>) -> Self {
        Self {
            accepted: accepted.into(),
            synced: synced.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_for_bare_host() {
        assert_eq!(
            JiraIntegration::base_url_for("acme.atlassian.net"),
            "https://acme.atlassian.net"
        );
        assert_eq!(
            JiraIntegration::base_url_for("acme.atlassian.net/"),
            "https://acme.atlassian.net"
        );
    }

    #[test]
    fn test_base_url_for_keeps_scheme() {
        assert_eq!(
            JiraIntegration::base_url_for("http://127.0.0.1:8080"),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_create_issue_url() {
        let jira = JiraIntegration {
            url: "https://acme.atlassian.net".to_string(),
            project: "PROJ".to_string(),
            issue_type: "Task".to_string(),
            backref_field: DEFAULT_BACKREF_FIELD.to_string(),
            auth: JiraAuth::Token {
                token: "abc".to_string(),
            },
            edge_access: None,
        };
        assert_eq!(
            jira.create_issue_url(),
            "https://acme.atlassian.net/rest/api/latest/issue/"
        );
    }

    #[test]
    fn test_passthrough_header() {
        assert_eq!(JiraAuth::passthrough_header("dXNlcjpwYXNz"), "Basic dXNlcjpwYXNz");
        assert_eq!(JiraAuth::passthrough_header("Bearer abc"), "Bearer abc");
    }

    #[test]
    fn test_full_name() {
        let github = GitHubIntegration {
            url: "https://api.github.com".to_string(),
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            token: "ghp_secret".to_string(),
        };
        assert_eq!(github.full_name(), "acme/widgets");
    }
}
