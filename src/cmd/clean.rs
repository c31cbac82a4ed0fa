use crate::config::{self, Configuration, rt::RtcClean};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Delete the generated output.
#[derive(Clone, Debug, Args)]
#[command(name = "clean")]
#[command(next_help_heading = "Clean")]
pub struct Clean {
    /// The output dir for the generated site
    #[arg(short, long)]
    pub dist: Option<PathBuf>,

    #[command(flatten)]
    pub core: super::core::Core,
}

impl Clean {
    /// Apply CLI overrides to the configuration.
    pub fn apply_to(self, mut config: Configuration) -> Result<Configuration> {
        let Self { dist, core } = self;

        config.build.dist = dist.unwrap_or(config.build.dist);

        let config = core.apply_to(config)?;

        Ok(config)
    }

    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        let (cfg, working_directory) = config::load(config).await?;

        let cfg = self.apply_to(cfg)?;
        let cfg = RtcClean::new(cfg, working_directory)?;

        cfg.core.enforce_version()?;

        cfg.clean().await?;

        Ok(())
    }
}
