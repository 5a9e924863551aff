use clap::Parser;
use std::io;
use std::process::ExitCode;
use tnmanage::cli::Cli;
use tnmanage::commands;
use tnmanage::config::{ConfigFile, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", commands::render_error(&e));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file = match &cli.config {
        Some(path) => ConfigFile::new(path),
        None => ConfigFile::default_location()?,
    };
    let settings = Settings::load(&file);

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    commands::run(cli, &file, &settings, &mut input, &mut out).await
}
