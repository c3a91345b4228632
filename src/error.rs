//! Error taxonomy for the issue manager
//!
//! Remote, session and settings failures share one enum so the controller can
//! report any of them without losing the variant.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The search endpoint rejected the repository (HTTP 422) or the
    /// identifier is not shaped `owner/name`
    #[error(
        "Unable to find repository: {0} (Do you have permission to access this repository?)"
    )]
    RepositoryNotFound(String),

    /// Network, TLS or timeout failure below the HTTP layer
    #[error("Request failed: {0}")]
    TransportFailure(String),

    #[error("Unexpected response from GitHub: HTTP {code}")]
    UnexpectedStatus { code: u16 },

    #[error("Failed to parse GitHub response: {0}")]
    DecodeFailure(String),

    #[error("You must supply a personal access token to create an issue")]
    MissingCredential,

    /// GitHub rejected the supplied token
    #[error("Unauthorized: GitHub rejected the access token")]
    Unauthorized,

    #[error("Invalid issue number: {requested}. Valid issues are 1-{total}")]
    IndexOutOfRange { requested: i64, total: usize },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Reading settings file {}: line {line}: malformed", path.display())]
    ConfigParse { path: PathBuf, line: usize },

    #[error("Failed to read settings file {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
