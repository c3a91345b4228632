//! Settings file support
//!
//! Reads `GitHubIssueManager.conf`, a plain `key = value` file:
//!
//! ```text
//! # Preferred editor for new issue bodies
//! editor = code --wait
//! ```

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "GitHubIssueManager.conf";

/// Recognized setting keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Editor,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Editor => "editor",
        }
    }

    /// Get all setting keys
    pub fn all() -> &'static [SettingKey] {
        &[SettingKey::Editor]
    }

    /// Case-insensitive lookup
    pub fn parse(key: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(key))
    }
}

/// Loaded settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Editor command used to write issue bodies
    pub editor: Option<String>,
}

impl Settings {
    /// Load settings from the working directory (defaults if the file is missing)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE_NAME))
    }

    /// Load settings from `path`
    ///
    /// A missing file yields the defaults. Any other read failure, or a
    /// malformed line, is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(Error::ConfigIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse settings file content; `path` is only used in error messages
    ///
    /// A leading UTF-8 byte order mark is skipped.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut settings = Self::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| Error::ConfigParse {
                path: PathBuf::from(path),
                line: index + 1,
            })?;
            let (key, value) = (key.trim(), value.trim());

            match SettingKey::parse(key) {
                Some(SettingKey::Editor) => settings.editor = Some(value.to_string()),
                None => tracing::debug!(key, "ignoring unknown setting"),
            }
        }

        Ok(settings)
    }

    /// Editor command to use
    ///
    /// An explicit override wins over the settings file; the platform default
    /// applies only when neither is set.
    pub fn resolve_editor(&self, override_editor: Option<&str>) -> String {
        [override_editor, self.editor.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(platform_editor)
    }
}

/// Platform fallback: `$VISUAL`, `$EDITOR`, then a stock editor
fn platform_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|e| !e.trim().is_empty())
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "vi".to_string()
            }
        })
}
