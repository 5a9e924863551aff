//! Subcommand implementations
//!
//! Each command resolves its own client from [`Settings`] plus its
//! `--server` / `--token` flags, performs one client operation and writes a
//! human-readable result to `out`. Errors are returned with context for
//! `main` to print.

pub mod add;
pub mod clear;
pub mod config;
pub mod list;
pub mod remove;

use crate::cli::{Cli, Command, ConnectionArgs};
use crate::config::{ConfigFile, Settings};
use crate::truenas::TrueNasClient;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

impl ConnectionArgs {
    /// Build a client from the flags, falling back to environment and file
    pub fn connect(&self, settings: &Settings) -> Result<TrueNasClient> {
        let config = settings
            .resolve(self.server.as_deref(), self.token.as_deref())
            .context("failed to create TrueNAS client")?;
        TrueNasClient::new(config).context("failed to create TrueNAS client")
    }
}

/// Run the parsed command line
pub async fn run<R, W>(
    cli: Cli,
    file: &ConfigFile,
    settings: &Settings,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    match cli.command {
        Command::Add(args) => add::run(&args, settings, out).await,
        Command::List(args) => list::run(&args, settings, out).await,
        Command::Remove(args) => remove::run(&args, settings, input, out).await,
        Command::Clear(args) => clear::run(&args, settings, input, out).await,
        Command::Config(cmd) => config::run(&cmd, file, out),
    }
}

/// Print `warning`, ask for confirmation and read one line from `input`
///
/// Only `y` or `yes` (any case, surrounding whitespace ignored) confirm. End of
/// input counts as a refusal.
pub fn confirm<R, W>(warning: &str, input: &mut R, out: &mut W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "WARNING: {}", warning)?;
    write!(out, "Are you sure? (y/n): ")?;
    out.flush()?;

    let mut response = String::new();
    input
        .read_line(&mut response)
        .context("failed to read confirmation")?;

    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Render an error and its causes on one line, skipping a cause whose text is
/// already part of the message directly above it
pub fn render_error(err: &anyhow::Error) -> String {
    let mut rendered = String::new();
    let mut previous: Option<String> = None;
    for cause in err.chain() {
        let text = cause.to_string();
        // A cause whose message embeds its source's message already shows it
        if previous.as_deref().is_some_and(|p| p.contains(&text)) {
            continue;
        }
        if !rendered.is_empty() {
            rendered.push_str(": ");
        }
        rendered.push_str(&text);
        previous = Some(text);
    }
    rendered
}
