use crate::{
    build::BuildSystem,
    config::{self, Configuration, FeedSource, Minify, rt::RtcBuild},
};
use anyhow::Result;
use clap::Args;
use std::{path::PathBuf, sync::Arc};

/// Build the site and all of its assets.
#[derive(Clone, Debug, Args)]
#[command(name = "build")]
#[command(next_help_heading = "Build")]
pub struct Build {
    /// Build in release mode
    #[arg(long)]
    pub release: Option<bool>,

    /// The output dir for the generated site
    #[arg(short, long)]
    pub dist: Option<PathBuf>,

    /// Run without accessing the network
    #[arg(long)]
    pub offline: Option<bool>,

    /// Where the feed list stage reads the feed from
    ///
    /// Either an http(s) URL, or a path relative to the output dir.
    #[arg(long)]
    pub feed_source: Option<FeedSource>,

    /// The id of the element receiving the post list
    #[arg(long)]
    pub feed_container: Option<String>,

    /// Enable minification.
    ///
    /// Overrides the `minify` setting of the configuration file.
    #[arg(short = 'M', long)]
    pub minify: Option<bool>,

    #[command(flatten)]
    pub core: super::core::Core,
}

impl Build {
    /// Apply CLI overrides to the configuration.
    pub fn apply_to(self, mut config: Configuration) -> Result<Configuration> {
        let Self {
            core,
            release,
            dist,
            offline,
            feed_source,
            feed_container,
            minify,
        } = self;

        config.build.release = release.unwrap_or(config.build.release);
        config.build.dist = dist.unwrap_or(config.build.dist);
        config.build.offline = offline.unwrap_or(config.build.offline);
        config.build.minify = minify
            .map(|minify| match minify {
                true => Minify::Always,
                false => Minify::Never,
            })
            .unwrap_or(config.build.minify);

        config.feed.source = feed_source.or(config.feed.source);
        config.feed.container = feed_container.unwrap_or(config.feed.container);

        let config = core.apply_to(config)?;

        Ok(config)
    }

    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        let (cfg, working_directory) = config::load(config).await?;

        let cfg = self.apply_to(cfg)?;
        let cfg = RtcBuild::new(cfg, working_directory)?;

        cfg.core.enforce_version()?;

        let mut system = BuildSystem::new(Arc::new(cfg)).await?;
        system.build().await?;

        Ok(())
    }
}
