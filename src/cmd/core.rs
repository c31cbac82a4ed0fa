use crate::config::Configuration;
use clap::Args;
use semver::VersionReq;

/// Options shared by every subcommand.
#[derive(Clone, Debug, Args)]
#[command(next_help_heading = "Core")]
pub struct Core {
    /// Override the required lectern version
    #[arg(long, env = "LECTERN_REQUIRED_VERSION")]
    pub required_version: Option<VersionReq>,
}

impl Core {
    /// Apply CLI overrides to the configuration.
    pub fn apply_to(self, mut config: Configuration) -> anyhow::Result<Configuration> {
        let Self { required_version } = self;

        config.core.lectern_version = required_version.unwrap_or(config.core.lectern_version);

        Ok(config)
    }
}
