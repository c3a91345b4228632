//! GitHub Issues client
//!
//! Searches a repository's issues and creates new ones. All HTTP goes through
//! the [`HttpClient`] trait so the transport can be replaced in tests.

use crate::error::{Error, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Base URL of the GitHub REST API
const API_BASE_URL: &str = "https://api.github.com";

/// Timeout applied to every request made by [`UreqHttpClient`]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub Issue representation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Issue {
    /// Issue number on GitHub
    #[serde(default)]
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Author of the issue
    pub user: User,

    /// Labels attached to the issue
    #[serde(default)]
    pub labels: Vec<Label>,

    /// Issue state
    pub state: IssueState,

    /// Users assigned to the issue
    #[serde(default)]
    pub assignees: Vec<User>,

    /// Number of comments
    #[serde(default)]
    pub comments: u64,

    /// Creation timestamp (ISO 8601)
    pub created_at: String,

    /// Issue body (GitHub sends null for an empty body)
    #[serde(default)]
    pub body: Option<String>,
}

/// GitHub user reference
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub login: String,
}

/// GitHub Label representation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => f.write_str("Open"),
            IssueState::Closed => f.write_str("Closed"),
        }
    }
}

/// Response of the issue search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Total number of matches reported by GitHub
    pub total_count: u64,

    /// Issues included in this response
    pub items: Vec<Issue>,
}

impl Issue {
    /// Calendar date of the creation timestamp (the part before `T`)
    pub fn date(&self) -> &str {
        self.created_at
            .split('T')
            .next()
            .unwrap_or(&self.created_at)
    }

    /// Issue body, empty when GitHub sent none
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Get label names as a comma-separated string
    pub fn label_names(&self) -> String {
        self.labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Get assignee logins as a comma-separated string
    pub fn assignee_names(&self) -> String {
        self.assignees
            .iter()
            .map(|u| u.login.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

/// HTTP response abstraction for testing
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP headers type
pub type Headers = Vec<(String, String)>;

/// Trait for HTTP operations (allows mocking)
///
/// Implementations return non-2xx responses as `Ok`; only failures below the
/// HTTP layer are errors.
#[cfg_attr(test, automock)]
pub trait HttpClient {
    /// Send a GET request
    fn get(&self, url: &str, headers: Headers) -> anyhow::Result<HttpResponse>;

    /// Send a POST request with JSON body
    fn post(&self, url: &str, headers: Headers, body: String) -> anyhow::Result<HttpResponse>;
}

/// Real HTTP client using ureq
pub struct UreqHttpClient {
    agent: ureq::Agent,
}

impl UreqHttpClient {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }
}

impl Default for UreqHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a ureq result into a response, keeping error statuses as values
fn into_http_response(
    result: std::result::Result<ureq::Response, ureq::Error>,
) -> anyhow::Result<HttpResponse> {
    match result {
        Ok(response) | Err(ureq::Error::Status(_, response)) => {
            let status = response.status();
            let body = response
                .into_string()
                .context("Failed to read response body")?;
            Ok(HttpResponse { status, body })
        }
        Err(err) => Err(anyhow::Error::new(err).context("HTTP request failed")),
    }
}

impl HttpClient for UreqHttpClient {
    fn get(&self, url: &str, headers: Headers) -> anyhow::Result<HttpResponse> {
        let mut request = self.agent.get(url);
        for (key, value) in &headers {
            request = request.set(key, value);
        }
        into_http_response(request.call())
    }

    fn post(&self, url: &str, headers: Headers, body: String) -> anyhow::Result<HttpResponse> {
        let mut request = self.agent.post(url);
        for (key, value) in &headers {
            request = request.set(key, value);
        }
        into_http_response(request.send_string(&body))
    }
}

/// Remote issue tracker operations the session depends on
#[cfg_attr(test, automock)]
pub trait IssueTracker {
    /// Search all issues of `repository` (`owner/name`)
    fn fetch_issues(&self, repository: &str) -> Result<SearchResult>;

    /// Create an issue in `repository` authenticated with `token`
    fn create_issue(&self, repository: &str, token: &str, title: &str, body: &str) -> Result<()>;
}

/// GitHub API client
pub struct GitHubClient<H: HttpClient = UreqHttpClient> {
    /// HTTP client
    http: H,
}

impl GitHubClient<UreqHttpClient> {
    /// Create a new GitHub client backed by ureq
    pub fn new() -> Self {
        Self {
            http: UreqHttpClient::new(),
        }
    }
}

impl Default for GitHubClient<UreqHttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HttpClient> GitHubClient<H> {
    /// Create client with custom HTTP client (for testing)
    pub fn with_http_client(http: H) -> Self {
        Self { http }
    }

    /// Build common headers for requests
    fn build_headers(&self, token: Option<&str>) -> Headers {
        let mut headers = vec![
            (
                "Accept".to_string(),
                "application/vnd.github.v3+json".to_string(),
            ),
            ("User-Agent".to_string(), "gh-issue-manager".to_string()),
        ];

        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        headers
    }
}

impl<H: HttpClient> IssueTracker for GitHubClient<H> {
    fn fetch_issues(&self, repository: &str) -> Result<SearchResult> {
        if !is_valid_repository(repository) {
            return Err(Error::RepositoryNotFound(repository.to_string()));
        }

        let url = format!("{API_BASE_URL}/search/issues?q=repo:{repository}");
        tracing::debug!(%url, "searching issues");

        let response = self
            .http
            .get(&url, self.build_headers(None))
            .map_err(|e| Error::TransportFailure(format!("{e:#}")))?;

        match response.status {
            200 => serde_json::from_str(&response.body)
                .map_err(|e| Error::DecodeFailure(e.to_string())),
            422 => Err(Error::RepositoryNotFound(repository.to_string())),
            code => Err(Error::UnexpectedStatus { code }),
        }
    }

    fn create_issue(&self, repository: &str, token: &str, title: &str, body: &str) -> Result<()> {
        if token.is_empty() {
            return Err(Error::MissingCredential);
        }
        if !is_valid_repository(repository) {
            return Err(Error::RepositoryNotFound(repository.to_string()));
        }

        let url = format!("{API_BASE_URL}/repos/{repository}/issues");

        let mut headers = self.build_headers(Some(token));
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        let json_body = serde_json::json!({ "title": title, "body": body }).to_string();

        tracing::debug!(%url, title, "creating issue");
        let response = self
            .http
            .post(&url, headers, json_body)
            .map_err(|e| Error::TransportFailure(format!("{e:#}")))?;

        match response.status {
            201 => Ok(()),
            401 | 404 => Err(Error::Unauthorized),
            code => Err(Error::UnexpectedStatus { code }),
        }
    }
}

/// Check that `repository` looks like `owner/name`
///
/// Both parts must be non-empty and limited to the characters GitHub allows
/// in account and repository names, so the identifier can be placed in a URL
/// without escaping.
pub fn is_valid_repository(repository: &str) -> bool {
    fn valid_part(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    match repository.split_once('/') {
        Some((owner, name)) => valid_part(owner) && valid_part(name),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue() -> Issue {
        Issue {
            number: 7,
            title: "Crash on startup".to_string(),
            user: User {
                login: "octocat".to_string(),
            },
            labels: vec![
                Label {
                    name: "bug".to_string(),
                },
                Label {
                    name: "help wanted".to_string(),
                },
            ],
            state: IssueState::Open,
            assignees: vec![],
            comments: 2,
            created_at: "2019-03-14T09:26:53Z".to_string(),
            body: None,
        }
    }

    #[test]
    fn test_issue_date() {
        assert_eq!(sample_issue().date(), "2019-03-14");
    }

    #[test]
    fn test_issue_date_without_time() {
        let mut issue = sample_issue();
        issue.created_at = "2019-03-14".to_string();
        assert_eq!(issue.date(), "2019-03-14");
    }

    #[test]
    fn test_issue_label_names() {
        assert_eq!(sample_issue().label_names(), "bug, help wanted");
    }

    #[test]
    fn test_issue_body_text_defaults_to_empty() {
        assert_eq!(sample_issue().body_text(), "");
    }

    #[test]
    fn test_issue_state_display() {
        assert_eq!(IssueState::Open.to_string(), "Open");
        assert_eq!(IssueState::Closed.to_string(), "Closed");
    }

    #[test]
    fn test_valid_repository_identifiers() {
        assert!(is_valid_repository("rust-lang/rust"));
        assert!(is_valid_repository("user_1/my.repo"));
        assert!(!is_valid_repository(""));
        assert!(!is_valid_repository("rust"));
        assert!(!is_valid_repository("/rust"));
        assert!(!is_valid_repository("rust-lang/"));
        assert!(!is_valid_repository("a/b/c"));
        assert!(!is_valid_repository("a b/c"));
        assert!(!is_valid_repository("a/b&state=open"));
    }

    #[test]
    fn test_issue_deserialize_minimal() {
        let json = r#"{
            "title": "Minimal",
            "user": {"login": "someone"},
            "state": "closed",
            "created_at": "2020-01-01T00:00:00Z",
            "body": null
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();

        assert_eq!(issue.state, IssueState::Closed);
        assert!(issue.labels.is_empty());
        assert!(issue.assignees.is_empty());
        assert_eq!(issue.comments, 0);
        assert_eq!(issue.body_text(), "");
    }

    #[test]
    fn test_into_http_response_keeps_error_status() {
        let response = ureq::Response::new(422, "Unprocessable Entity", "{}").unwrap();

        let result = into_http_response(Err(ureq::Error::Status(422, response))).unwrap();

        assert_eq!(result.status, 422);
        assert_eq!(result.body, "{}");
    }

    #[test]
    fn test_into_http_response_success() {
        let response = ureq::Response::new(201, "Created", r#"{"id":1}"#).unwrap();

        let result = into_http_response(Ok(response)).unwrap();

        assert_eq!(result.status, 201);
        assert_eq!(result.body, r#"{"id":1}"#);
    }

    #[test]
    fn test_into_http_response_transport_error() {
        // An unparseable URL fails before any connection is made
        let err = into_http_response(ureq::get("not a url").call()).unwrap_err();

        assert!(err.to_string().contains("HTTP request failed"));
    }
}


// Integration tests that require actual GitHub API access
#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    #[ignore] // Run with: cargo test integration_tests -- --ignored
    fn test_fetch_issues_from_public_repo() {
        let client = GitHubClient::new();
        let result = client.fetch_issues("rust-lang/rust").unwrap();

        assert!(!result.items.is_empty());
    }
}
