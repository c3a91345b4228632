//! CLI argument parsing

use clap::Parser;
use gh_issue_manager::settings::SETTINGS_FILE_NAME;
use std::path::PathBuf;

/// Environment variable consulted when `--token` is not given
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "gh-issue-manager")]
#[command(author, version, about = "Browse and create GitHub issues from the terminal")]
pub struct Cli {
    /// Repository in owner/name format
    pub repository: String,

    /// Personal access token used to create issues (default: $GITHUB_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Editor command for issue bodies (overrides the settings file)
    #[arg(short, long)]
    pub editor: Option<String>,

    /// Settings file
    #[arg(short, long, default_value = SETTINGS_FILE_NAME)]
    pub config: PathBuf,
}

impl Cli {
    /// Token from the flag, falling back to the environment
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Set (or clear) `GITHUB_TOKEN` for the duration of `f`, then restore it
    fn with_token_env<F: FnOnce()>(value: Option<&str>, f: F) {
        let previous = std::env::var_os(TOKEN_ENV_VAR);
        // SAFETY: callers are #[serial], so no other test touches the environment
        unsafe {
            match value {
                Some(value) => std::env::set_var(TOKEN_ENV_VAR, value),
                None => std::env::remove_var(TOKEN_ENV_VAR),
            }
        }

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        // SAFETY: see above
        unsafe {
            match previous {
                Some(previous) => std::env::set_var(TOKEN_ENV_VAR, previous),
                None => std::env::remove_var(TOKEN_ENV_VAR),
            }
        }
        if let Err(panic) = result {
            std::panic::resume_unwind(panic);
        }
    }

    #[test]
    fn test_parse_repository_only() {
        let cli = Cli::try_parse_from(["gh-issue-manager", "rust-lang/rust"]).unwrap();

        assert_eq!(cli.repository, "rust-lang/rust");
        assert!(cli.editor.is_none());
        assert_eq!(cli.config, PathBuf::from(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "gh-issue-manager",
            "-t",
            "abc",
            "--editor",
            "code --wait",
            "-c",
            "other.conf",
            "octo/repo",
        ])
        .unwrap();

        assert_eq!(cli.repository, "octo/repo");
        assert_eq!(cli.resolve_token(), Some("abc".to_string()));
        assert_eq!(cli.editor, Some("code --wait".to_string()));
        assert_eq!(cli.config, PathBuf::from("other.conf"));
    }

    #[test]
    #[serial]
    fn test_token_from_env_when_flag_absent() {
        with_token_env(Some("from-env"), || {
            let cli = Cli::try_parse_from(["gh-issue-manager", "octo/repo"]).unwrap();
            assert_eq!(cli.resolve_token(), Some("from-env".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_blank_env_token_is_none() {
        with_token_env(Some("   "), || {
            let cli = Cli::try_parse_from(["gh-issue-manager", "octo/repo"]).unwrap();
            assert_eq!(cli.resolve_token(), None);
        });
    }

    #[test]
    #[serial]
    fn test_no_token_anywhere_is_none() {
        with_token_env(None, || {
            let cli = Cli::try_parse_from(["gh-issue-manager", "octo/repo"]).unwrap();
            assert_eq!(cli.resolve_token(), None);
        });
    }

    #[test]
    #[serial]
    fn test_token_flag_wins_over_env() {
        with_token_env(Some("from-env"), || {
            let cli =
                Cli::try_parse_from(["gh-issue-manager", "--token", "from-flag", "octo/repo"])
                    .unwrap();
            assert_eq!(cli.resolve_token(), Some("from-flag".to_string()));
        });
    }

    #[test]
    fn test_missing_repository_is_error() {
        assert!(Cli::try_parse_from(["gh-issue-manager"]).is_err());
    }
}
