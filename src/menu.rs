//! Interactive menu loop
//!
//! Reads one command per line, dispatches it to the [`RepositorySession`] and
//! prints the result. Input and output are generic so the loop can be driven
//! from tests.

use crate::editor::TextEditor;
use crate::error::Error;
use crate::github::{Issue, IssueTracker};
use crate::session::{RepositorySession, WriteOutcome, MAX_TITLE_LENGTH};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Menu commands, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Read,
    Create,
    Update,
    Delete,
    Refresh,
    Quit,
}

impl Command {
    /// All commands in menu order
    pub fn all() -> &'static [Command] {
        &[
            Command::List,
            Command::Read,
            Command::Create,
            Command::Update,
            Command::Delete,
            Command::Refresh,
            Command::Quit,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::List => "List Issues",
            Command::Read => "Read Issue",
            Command::Create => "Create Issue",
            Command::Update => "Update Issue",
            Command::Delete => "Delete Issue",
            Command::Refresh => "Refresh",
            Command::Quit => "Quit",
        }
    }

    /// Whether the command reads the snapshot and needs it fresh
    ///
    /// Update and Delete only check the index against the snapshot already
    /// held, so they never trigger a refresh.
    pub fn reads_snapshot(&self) -> bool {
        matches!(self, Command::List | Command::Read)
    }
}

/// Parse a menu selection
///
/// Accepts a 1-based menu number, or `q`/`quit` in any case.
pub fn parse_command(input: &str) -> Result<Command, Error> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Ok(Command::Quit);
    }

    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| Command::all().get(i).copied())
        .ok_or_else(|| Error::InvalidCommand(input.to_string()))
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingCommand,
    Listing,
    Reading,
    Creating,
    Updating,
    Deleting,
    Refreshing,
    Quitting,
}

impl From<Command> for ControllerState {
    fn from(command: Command) -> Self {
        match command {
            Command::List => ControllerState::Listing,
            Command::Read => ControllerState::Reading,
            Command::Create => ControllerState::Creating,
            Command::Update => ControllerState::Updating,
            Command::Delete => ControllerState::Deleting,
            Command::Refresh => ControllerState::Refreshing,
            Command::Quit => ControllerState::Quitting,
        }
    }
}

/// Menu loop over a session
pub struct Controller<T, E, R, W>
where
    T: IssueTracker,
    E: TextEditor,
    R: BufRead,
    W: Write,
{
    session: RepositorySession<T>,
    editor: E,
    input: R,
    output: W,
    state: ControllerState,
}

impl<T, E, R, W> Controller<T, E, R, W>
where
    T: IssueTracker,
    E: TextEditor,
    R: BufRead,
    W: Write,
{
    pub fn new(session: RepositorySession<T>, editor: E, input: R, output: W) -> Self {
        Self {
            session,
            editor,
            input,
            output,
            state: ControllerState::AwaitingCommand,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn session(&self) -> &RepositorySession<T> {
        &self.session
    }

    /// Run until the user quits or input ends
    ///
    /// Only terminal I/O failures are returned; command failures are printed
    /// and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        while self.state != ControllerState::Quitting {
            self.render_menu()?;

            let command = match self.read_line("  > ")? {
                Some(line) => parse_command(&line),
                None => {
                    tracing::debug!("end of input; quitting");
                    Ok(Command::Quit)
                }
            };

            match command {
                Ok(command) => self.dispatch(command)?,
                Err(err) => self.report(&err)?,
            }
        }

        writeln!(self.output, "Quitting...")?;
        Ok(())
    }

    /// Run a single command and return to `AwaitingCommand` (or `Quitting`)
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        self.state = command.into();
        tracing::debug!(?command, state = ?self.state, "dispatching");

        if command.reads_snapshot() {
            if let Err(err) = self.session.ensure_fresh() {
                self.report(&err)?;
                self.state = ControllerState::AwaitingCommand;
                return Ok(());
            }
        }

        match command {
            Command::List => self.list_issues()?,
            Command::Read => self.read_issue()?,
            Command::Create => self.create_issue()?,
            Command::Update => self.write_placeholder("Update", |s, n| s.update(n))?,
            Command::Delete => self.write_placeholder("Delete", |s, n| s.delete(n))?,
            Command::Refresh => self.refresh()?,
            Command::Quit => return Ok(()),
        }

        self.state = ControllerState::AwaitingCommand;
        Ok(())
    }

    fn render_menu(&mut self) -> Result<()> {
        let repo = self.session.repository();
        let stale = if repo.is_dirty() { " (stale)" } else { "" };
        writeln!(
            self.output,
            "\n[ Repo: {} ] Issues: {} ({} open / {} closed){}",
            repo.name(),
            repo.total_issues(),
            repo.open_issues(),
            repo.closed_issues(),
            stale
        )?;
        for (i, command) in Command::all().iter().enumerate() {
            writeln!(self.output, "  ({})  {}", i + 1, command.label())?;
        }
        Ok(())
    }

    fn list_issues(&mut self) -> Result<()> {
        let entries = self.session.list();
        let width = MAX_TITLE_LENGTH;

        writeln!(self.output, "\n{:<8}{:<width$} {:<10} Date", "#", "Name", "State")?;
        writeln!(
            self.output,
            "{} {} {} {}",
            "-".repeat(7),
            "-".repeat(width),
            "-".repeat(10),
            "-".repeat(10)
        )?;
        for entry in &entries {
            writeln!(
                self.output,
                "{:<8}{:<width$} {:<10} {}",
                format!("[{}]", entry.index),
                entry.title,
                format!("[{}]", entry.state),
                entry.date
            )?;
        }

        let repo = self.session.repository();
        if repo.remote_total() > repo.total_issues() as u64 {
            writeln!(
                self.output,
                "(showing {} of {} issues)",
                repo.total_issues(),
                repo.remote_total()
            )?;
        }
        Ok(())
    }

    fn read_issue(&mut self) -> Result<()> {
        let Some(index) = self.prompt_index()? else {
            return Ok(());
        };

        match self.session.read_by_index(index) {
            Ok(issue) => {
                let text = format_issue(issue);
                writeln!(self.output, "{text}")?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn create_issue(&mut self) -> Result<()> {
        // Fail before asking for a title nobody can submit
        if !self.session.has_credential() {
            return self.report(&Error::MissingCredential);
        }

        let Some(title) = self.read_line("  Enter title: ")? else {
            return Ok(());
        };
        let title = title.trim().to_string();

        let body = match self.editor.edit(&title) {
            Ok(body) => body,
            Err(err) => return self.report(&err),
        };

        match self.session.create(&title, &body) {
            Ok(()) => writeln!(self.output, "\n  Created issue: {title}\n")?,
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn write_placeholder<F>(&mut self, action: &str, op: F) -> Result<()>
    where
        F: FnOnce(&mut RepositorySession<T>, i64) -> crate::Result<WriteOutcome>,
    {
        let Some(index) = self.prompt_index()? else {
            return Ok(());
        };
        if let Err(err) = self.session.read_by_index(index) {
            return self.report(&err);
        }

        match op(&mut self.session, index) {
            Ok(WriteOutcome::NotImplemented) => {
                writeln!(self.output, "  {action} is not implemented yet; nothing changed")?
            }
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        match self.session.refresh() {
            Ok(()) => {
                let repo = self.session.repository();
                writeln!(
                    self.output,
                    "  Refreshed: {} issues ({} open / {} closed)",
                    repo.total_issues(),
                    repo.open_issues(),
                    repo.closed_issues()
                )?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    /// Ask for an issue number; non-numeric input is reported as out of range
    fn prompt_index(&mut self) -> Result<Option<i64>> {
        let Some(line) = self.read_line("\n  Enter an issue number: ")? else {
            return Ok(None);
        };

        match line.trim().parse::<i64>() {
            Ok(index) => Ok(Some(index)),
            Err(_) => {
                writeln!(
                    self.output,
                    "[!] Invalid issue number: {}. Valid issues are 1-{}",
                    line.trim(),
                    self.session.repository().total_issues()
                )?;
                Ok(None)
            }
        }
    }

    /// Print `prompt` and read one line; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from standard input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn report(&mut self, err: &dyn std::fmt::Display) -> Result<()> {
        tracing::warn!(error = %err, "command failed");
        writeln!(self.output, "[!] {err}")?;
        Ok(())
    }
}

/// Full text of an issue for the read view
pub fn format_issue(issue: &Issue) -> String {
    let mut text = format!(
        "\nTitle:  {}\nAuthor: {}\nDate:   {}\nState:  {}\n",
        issue.title,
        issue.user.login,
        issue.date(),
        issue.state
    );
    if !issue.labels.is_empty() {
        text.push_str(&format!("Labels: {}\n", issue.label_names()));
    }
    if !issue.assignees.is_empty() {
        text.push_str(&format!("Assigned: {}\n", issue.assignee_names()));
    }
    text.push_str(&format!("Comments: {}\n\n{}", issue.comments, issue.body_text()));
    text
}
