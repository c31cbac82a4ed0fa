use crate::config::rt::RtcCore;
use crate::config::Configuration;
use std::path::PathBuf;
use std::sync::Arc;

/// Runtime config for the clean system.
#[derive(Clone, Debug)]
pub struct RtcClean {
    pub core: Arc<RtcCore>,
    /// The output dir to delete.
    pub dist: PathBuf,
}

impl RtcClean {
    pub(crate) fn new(config: Configuration, working_directory: PathBuf) -> anyhow::Result<Self> {
        let Configuration { core, build, .. } = config;

        let core = Arc::new(RtcCore::new(core, working_directory));

        let dist = if build.dist.is_absolute() {
            build.dist
        } else {
            core.working_directory.join(build.dist)
        };

        Ok(Self { core, dist })
    }

    /// Delete the output directory.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn clean(&self) -> anyhow::Result<()> {
        tracing::debug!(path = ?self.dist, "cleaning output dir");
        crate::common::remove_dir_all(self.dist.clone()).await
    }
}
