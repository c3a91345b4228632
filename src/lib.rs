//! gh-issue-manager - browse and create GitHub issues from the terminal
//!
//! # Modules
//!
//! - [`github`] - GitHub search/create client behind a mockable HTTP seam
//! - [`session`] - Local issue snapshot and its refresh protocol
//! - [`menu`] - Interactive command loop
//! - [`settings`] - `GitHubIssueManager.conf` loading
//! - [`editor`] - External editor for issue bodies

pub mod debug;
pub mod editor;
pub mod error;
pub mod github;
pub mod menu;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use editor::{ExternalEditor, TextEditor};
pub use error::{Error, Result};
pub use github::{GitHubClient, Issue, IssueState, IssueTracker};
pub use menu::{Command, Controller, ControllerState};
pub use session::{Repository, RepositorySession, WriteOutcome};
pub use settings::Settings;
