use crate::config::{self, Configuration};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Lectern config controls.
#[derive(Clone, Debug, Args)]
#[command(name = "config")]
pub struct Config {
    #[command(subcommand)]
    action: ConfigSubcommands,
}

impl Config {
    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        match self.action {
            ConfigSubcommands::Show => {
                let (cfg, _working_directory) = config::load(config).await?;
                println!("{:#?}", cfg);
            }
            ConfigSubcommands::Schema => {
                let schema = schemars::schema_for!(Configuration);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Subcommand)]
enum ConfigSubcommands {
    /// Show lectern's current config pre-CLI.
    Show,
    /// Print the JSON schema of the config file.
    Schema,
}
