use crate::config::Core;
use crate::version::{self, enforce_requirement};
use anyhow::Context;
use semver::{Version, VersionReq};
use std::path::PathBuf;

/// Runtime config for the core project.
#[derive(Clone, Debug)]
pub struct RtcCore {
    pub lectern_version: VersionReq,
    pub working_directory: PathBuf,
}

impl RtcCore {
    pub(super) fn new(core: Core, working_directory: PathBuf) -> Self {
        let Core {
            lectern_version,
            working_directory: working_directory_override,
        } = core;
        Self {
            lectern_version,
            working_directory: working_directory_override.unwrap_or(working_directory),
        }
    }

    /// Ensure that the currently running version matches the version required by the project.
    pub fn enforce_version(&self) -> anyhow::Result<()> {
        enforce_requirement(
            &self.lectern_version,
            Version::parse(version::VERSION).context("error parsing current version")?,
        )
    }

    #[cfg(test)]
    pub(super) fn new_test() -> Self {
        RtcCore {
            lectern_version: VersionReq::STAR,
            working_directory: Default::default(),
        }
    }
}
