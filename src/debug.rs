//! Debug logging
//!
//! Installs a `tracing` subscriber that appends to `gh-issue-manager.log` in
//! the working directory. Debug builds always log; release builds only log
//! when `RUST_LOG` is set. Log records never go to the terminal, which
//! belongs to the interactive menu. If logging cannot start, a single warning
//! is printed to stderr before the menu appears.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log file name
pub const LOG_FILE_NAME: &str = "gh-issue-manager.log";

/// Initialize debug logging
pub fn init() {
    let from_env = EnvFilter::try_from_default_env().ok();
    if from_env.is_none() && !cfg!(debug_assertions) {
        return;
    }
    let filter = from_env.unwrap_or_else(|| EnvFilter::new("gh_issue_manager=debug"));

    match install(Path::new(LOG_FILE_NAME), filter) {
        Ok(()) => tracing::info!("=== Debug session started ==="),
        Err(err) => eprintln!("warning: debug logging disabled: {err:#}"),
    }
}

/// Install the file subscriber as the global default
fn install(path: &Path, filter: EnvFilter) -> Result<()> {
    let file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Failed to install log subscriber")
}

/// Open `path` for appending, creating it if needed
fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(LOG_FILE_NAME);

        let err = open_log_file(&path).unwrap_err();

        assert!(format!("{err:#}").contains("Failed to open log file"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_install_reports_unopenable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(LOG_FILE_NAME);

        let err = install(&path, EnvFilter::new("off")).unwrap_err();

        assert!(err.to_string().contains("Failed to open log file"));
    }
}
