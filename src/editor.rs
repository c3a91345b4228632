//! External text editor integration
//!
//! Issue bodies are written in the user's editor. The text lives in a
//! temporary file that is removed once the editor has exited, whatever the
//! outcome.

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::process::Command;

#[cfg(test)]
use mockall::automock;

/// Longest name fragment used in temp file names
const MAX_NAME_LENGTH: usize = 32;

/// Something that lets the user write text
#[cfg_attr(test, automock)]
pub trait TextEditor {
    /// Let the user edit a new document called `name` and return its text
    fn edit(&self, name: &str) -> Result<String>;
}

/// Launches an external editor command on a temp file
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// `command` may include arguments, e.g. `code --wait`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl TextEditor for ExternalEditor {
    fn edit(&self, name: &str) -> Result<String> {
        let mut args = shlex::split(&self.command)
            .filter(|args| !args.is_empty())
            .ok_or_else(|| anyhow!("Invalid editor command: {:?}", self.command))?;
        let program = args.remove(0);

        // TempPath deletes the file on drop, so every return below cleans up
        let path = tempfile::Builder::new()
            .prefix(&format!("{}-", temp_file_stem(name)))
            .suffix(".md")
            .tempfile()
            .context("Failed to create temporary file")?
            .into_temp_path();

        tracing::debug!(editor = %self.command, path = %path.display(), "launching editor");
        let status = Command::new(&program)
            .args(&args)
            .arg(&path)
            .status()
            .with_context(|| format!("Failed to launch editor: {program}"))?;

        if !status.success() {
            bail!("Editor exited with {status}");
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(format!("{}\n", text.trim()))
    }
}

/// File-name-safe version of `name`
fn temp_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(MAX_NAME_LENGTH)
        .collect();

    if stem.is_empty() {
        "issue".to_string()
    } else {
        stem
    }
}
