use crate::{
    config::{self, Configuration, rt::RtcServe},
    serve::ServeSystem,
};
use anyhow::Result;
use clap::Args;
use std::{net::IpAddr, path::PathBuf, sync::Arc};
use tokio::sync::broadcast;

/// Build the site and serve it over HTTP.
#[derive(Clone, Debug, Args)]
#[command(name = "serve")]
#[command(next_help_heading = "Serve")]
pub struct Serve {
    /// The address to serve on
    #[arg(long)]
    pub address: Option<IpAddr>,

    /// The addresses to serve on
    #[arg(long)]
    pub addresses: Option<Vec<IpAddr>>,

    /// The port to serve on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Open a browser tab once the initial build is complete
    #[arg(long)]
    pub open: Option<bool>,

    #[command(flatten)]
    pub build: super::build::Build,
}

impl Serve {
    /// Apply CLI overrides to the configuration.
    pub fn apply_to(self, mut config: Configuration) -> Result<Configuration> {
        let Self {
            address,
            addresses,
            port,
            open,
            build,
        } = self;

        config.serve.addresses = addresses.unwrap_or(config.serve.addresses);
        // The single-address flag folds into the address list, same as its config counterpart.
        if let Some(address) = address {
            config.serve.addresses.push(address);
        }
        config.serve.port = port.unwrap_or(config.serve.port);
        config.serve.open = open.unwrap_or(config.serve.open);

        let config = build.apply_to(config)?;

        Ok(config)
    }

    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        let (cfg, working_directory) = config::load(config).await?;

        let cfg = self.apply_to(cfg)?;
        let cfg = RtcServe::new(cfg, working_directory)?;

        cfg.build.core.enforce_version()?;

        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
        tokio::spawn(handle_shutdown(shutdown_tx.clone()));

        let system = ServeSystem::new(Arc::new(cfg), shutdown_tx).await?;
        system.run().await?;

        Ok(())
    }
}

async fn handle_shutdown(shutdown_tx: broadcast::Sender<()>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "error awaiting shutdown signal");
    }
    tracing::debug!("received shutdown signal");
    let _res = shutdown_tx.send(());
}
