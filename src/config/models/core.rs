use crate::config::models::ConfigModel;
use schemars::JsonSchema;
use semver::VersionReq;
use serde::Deserialize;
use std::path::PathBuf;

/// Config options for the core project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Core {
    /// The required version of lectern [default: any]
    #[serde(default)]
    // align that with cargo's `rust-version`
    #[serde(alias = "lectern-version")]
    #[schemars(with = "Option<String>")]
    pub lectern_version: VersionReq,

    #[serde(skip)]
    pub working_directory: Option<PathBuf>,
}

impl ConfigModel for Core {}
