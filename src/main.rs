#![deny(clippy::unwrap_used)]

mod build;
mod cmd;
mod common;
mod config;
mod feed;
mod processing;
mod serve;
mod site;
mod version;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use common::STARTING;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Lectern::parse();

    tracing_subscriber::registry()
        // Filter spans based on the configured verbosity.
        .with(eval_logging(&cli))
        // Send a copy of all spans to stdout.
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        // Install the assembled registry process-wide.
        .try_init()
        .context("error initializing logging")?;

    tracing::info!(
        "{} Starting {} {}",
        STARTING,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    cli.run().await
}

fn eval_logging(cli: &Lectern) -> tracing_subscriber::EnvFilter {
    let directives = match (cli.verbose, cli.quiet) {
        // --quiet wins over any -v flags
        (_, true) => "error,lectern=warn",
        // each -v raises the level
        (0, false) => "error,lectern=info",
        (1, false) => "error,lectern=debug",
        (_, false) => "error,lectern=trace",
    };
    tracing_subscriber::EnvFilter::new(directives)
}

/// Build, publish & serve your Markdown content as a static site.
#[derive(Parser)]
#[command(about, author, version)]
struct Lectern {
    #[command(subcommand)]
    action: LecternSubcommands,
    /// Path to the lectern config file [default: Lectern.toml]
    #[arg(long, env = "LECTERN_CONFIG", global(true))]
    pub config: Option<PathBuf>,
    /// Raise the log level, may be given multiple times.
    #[arg(short, long, global(true), action=ArgAction::Count)]
    pub verbose: u8,
    /// Only log warnings and errors, conflicts with --verbose
    #[arg(short, long, global(true), conflicts_with("verbose"))]
    pub quiet: bool,
}

impl Lectern {
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn run(self) -> Result<()> {
        match self.action {
            LecternSubcommands::Build(inner) => inner.run(self.config).await,
            LecternSubcommands::Clean(inner) => inner.run(self.config).await,
            LecternSubcommands::Serve(inner) => inner.run(self.config).await,
            LecternSubcommands::Config(inner) => inner.run(self.config).await,
        }
    }
}

#[derive(Subcommand)]
enum LecternSubcommands {
    /// Build the site and all of its assets.
    Build(cmd::build::Build),
    /// Build the site and serve it over HTTP.
    Serve(cmd::serve::Serve),
    /// Delete the generated output.
    Clean(cmd::clean::Clean),
    /// Lectern config controls.
    Config(cmd::config::Config),
}

#[cfg(test)]
mod tests {
    use crate::Lectern;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Lectern::command().debug_assert();
    }
}
