//! Repository session
//!
//! Owns the local snapshot of one repository's issues and brokers every read
//! and write through it. The snapshot is only ever replaced wholesale by a
//! successful fetch; writes mark it dirty until the next refresh.

use crate::error::{Error, Result};
use crate::github::{Issue, IssueState, IssueTracker};

/// Width of the title column in issue listings
pub const MAX_TITLE_LENGTH: usize = 40;

const ELLIPSIS: &str = "...";

/// Cached view of a repository
#[derive(Debug, Clone)]
pub struct Repository {
    name: String,
    total_issues: usize,
    open_issues: usize,
    remote_total: u64,
    issues: Option<Vec<Issue>>,
    token: Option<String>,
    dirty: bool,
}

impl Repository {
    fn new(name: &str, token: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            total_issues: 0,
            open_issues: 0,
            remote_total: 0,
            issues: None,
            token: token.filter(|t| !t.is_empty()),
            dirty: false,
        }
    }

    /// Repository identifier in `owner/name` format
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of issues in the snapshot
    pub fn total_issues(&self) -> usize {
        self.total_issues
    }

    pub fn open_issues(&self) -> usize {
        self.open_issues
    }

    pub fn closed_issues(&self) -> usize {
        self.total_issues - self.open_issues
    }

    /// Match count reported by GitHub, which can exceed the fetched page
    pub fn remote_total(&self) -> u64 {
        self.remote_total
    }

    /// Fetched issues, `None` before the first successful fetch
    pub fn issues(&self) -> Option<&[Issue]> {
        self.issues.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

/// One row of an issue listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 1-based display index
    pub index: usize,
    pub title: String,
    pub state: IssueState,
    pub date: String,
}

/// Result of a write that may not be supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The operation has no implementation yet; nothing was changed
    NotImplemented,
}

/// Session over a single repository
pub struct RepositorySession<T: IssueTracker> {
    tracker: T,
    repo: Repository,
}

impl<T: IssueTracker> RepositorySession<T> {
    /// Create a session; no request is made until [`refresh`](Self::refresh)
    pub fn new(tracker: T, repository: &str, token: Option<String>) -> Self {
        Self {
            tracker,
            repo: Repository::new(repository, token),
        }
    }

    /// Read-only view of the current snapshot
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn is_dirty(&self) -> bool {
        self.repo.dirty
    }

    pub fn has_credential(&self) -> bool {
        self.repo.has_token()
    }

    /// Stored token, or `MissingCredential`
    fn credential(&self) -> Result<&str> {
        self.repo.token.as_deref().ok_or(Error::MissingCredential)
    }

    /// Replace the snapshot with the remote state
    ///
    /// On failure the previous snapshot is kept as it was.
    pub fn refresh(&mut self) -> Result<()> {
        let result = self.tracker.fetch_issues(&self.repo.name)?;

        let open_issues = result.items.iter().filter(|i| i.is_open()).count();
        self.repo.total_issues = result.items.len();
        self.repo.open_issues = open_issues;
        self.repo.remote_total = result.total_count;
        self.repo.issues = Some(result.items);
        self.repo.dirty = false;

        tracing::info!(
            repository = %self.repo.name,
            total = self.repo.total_issues,
            open = self.repo.open_issues,
            "snapshot refreshed"
        );
        Ok(())
    }

    /// Refresh when the snapshot is stale or was never fetched
    pub fn ensure_fresh(&mut self) -> Result<()> {
        if self.repo.dirty || self.repo.issues.is_none() {
            self.refresh()?;
        }
        Ok(())
    }

    /// Listing rows for the current snapshot
    pub fn list(&self) -> Vec<ListEntry> {
        self.repo
            .issues()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, issue)| ListEntry {
                index: i + 1,
                title: truncate_title(&issue.title, MAX_TITLE_LENGTH),
                state: issue.state,
                date: issue.date().to_string(),
            })
            .collect()
    }

    /// Issue at 1-based position `index`
    pub fn read_by_index(&self, index: i64) -> Result<&Issue> {
        self.position(index)
            .and_then(|pos| self.repo.issues().and_then(|issues| issues.get(pos)))
            .ok_or(Error::IndexOutOfRange {
                requested: index,
                total: self.repo.total_issues,
            })
    }

    /// Create an issue remotely and mark the snapshot stale
    ///
    /// The new issue only shows up locally after the next refresh.
    pub fn create(&mut self, title: &str, body: &str) -> Result<()> {
        let token = self.credential()?;
        self.tracker
            .create_issue(&self.repo.name, token, title, body)?;

        self.repo.dirty = true;
        tracing::info!(repository = %self.repo.name, title, "issue created; snapshot marked dirty");
        Ok(())
    }

    /// Update the issue at `index`
    ///
    /// Not implemented: always reports [`WriteOutcome::NotImplemented`]
    /// without looking at the index or touching remote or local state.
    pub fn update(&mut self, index: i64) -> Result<WriteOutcome> {
        tracing::debug!(repository = %self.repo.name, index, "update requested");
        Ok(WriteOutcome::NotImplemented)
    }

    /// Delete the issue at `index`
    ///
    /// Not implemented, see [`update`](Self::update).
    pub fn delete(&mut self, index: i64) -> Result<WriteOutcome> {
        tracing::debug!(repository = %self.repo.name, index, "delete requested");
        Ok(WriteOutcome::NotImplemented)
    }

    /// 0-based snapshot position for a 1-based index in `1..=total`
    fn position(&self, index: i64) -> Option<usize> {
        let index = usize::try_from(index).ok()?;
        (1..=self.repo.total_issues)
            .contains(&index)
            .then(|| index - 1)
    }
}

/// Shorten `title` to `max` characters, ending in `...` when cut
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() > max {
        let keep = max.saturating_sub(ELLIPSIS.len());
        let mut truncated: String = title.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        title.to_string()
    }
}
