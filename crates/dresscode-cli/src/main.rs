//! Dresscode CLI - Command-line entry point for the dress-code survey pipeline.

use anyhow::Context;
use clap::Parser;
use dresscode_cli::{commands, Cli, Command};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit code after Ctrl+C
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // Log to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupted; rows already appended are kept");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => commands::execute_run(args).await.context("run failed"),
        Command::Validate(args) => commands::execute_validate(args)
            .await
            .context("validation failed"),
        Command::Models(args) => commands::execute_models(args)
            .await
            .context("model listing failed"),
    }
}
