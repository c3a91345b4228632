mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use gh_issue_manager::{Controller, ExternalEditor, GitHubClient, RepositorySession, Settings};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();
    gh_issue_manager::debug::init();

    // Settings are read once and passed down; a malformed file is fatal
    let settings = Settings::load_from(&cli.config)?;
    let editor = ExternalEditor::new(settings.resolve_editor(cli.editor.as_deref()));
    tracing::debug!(editor = editor.command(), "editor resolved");

    let mut session =
        RepositorySession::new(GitHubClient::new(), &cli.repository, cli.resolve_token());
    session
        .refresh()
        .with_context(|| format!("Failed to fetch issues for {}", cli.repository))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut controller = Controller::new(session, editor, stdin.lock(), stdout.lock());
    controller.run()
}
