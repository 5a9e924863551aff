use crate::cli::ConfigCommand;
use crate::config::{ConfigFile, ConfigKey};
use anyhow::{Context, Result};
use std::io::Write;

pub fn run<W: Write>(cmd: &ConfigCommand, file: &ConfigFile, out: &mut W) -> Result<()> {
    match cmd {
        ConfigCommand::Server { url } => {
            file.set(ConfigKey::ServerUrl, url)
                .context("failed to save server URL")?;
            writeln!(out, "Server URL set to: {}", url)?;
        }
        ConfigCommand::Token { token } => {
            file.set(ConfigKey::ApiKey, token)
                .context("failed to save API token")?;
            writeln!(out, "API token saved successfully")?;
        }
    }
    writeln!(out, "Configuration saved to {}", file.path().display())?;
    Ok(())
}
