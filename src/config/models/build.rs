use crate::config::models::ConfigModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config options for the build system.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Build {
    /// The output dir for the generated site [default: dist]
    #[serde(default = "default::dist", alias = "output_dir")]
    pub dist: PathBuf,

    /// Build in release mode [default: false]
    #[serde(default)]
    pub release: bool,

    /// Run without accessing the network [default: false]
    ///
    /// When the feed source is a URL, the feed list stage is skipped instead of fetching.
    #[serde(default)]
    pub offline: bool,

    /// Control minification of the generated pages [default: never]
    #[serde(default)]
    pub minify: Minify,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            dist: default::dist(),
            release: false,
            offline: false,
            minify: Default::default(),
        }
    }
}

impl ConfigModel for Build {}

mod default {
    use std::path::PathBuf;

    pub fn dist() -> PathBuf {
        crate::config::DIST_DIR.into()
    }
}

/// Mode for minifying the generated pages.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Minify {
    /// Never minify
    #[default]
    Never,
    /// Minify for release builds
    OnRelease,
    /// Minify for all builds
    Always,
}
