//! The configuration model, as read from a config file.
//!
//! CLI arguments override parts of this model before it is turned into the runtime config the
//! systems work with.

pub mod source;

mod build;
mod core;
mod feed;
mod serve;
mod site;

pub use build::*;
pub use core::*;
pub use feed::*;
pub use serve::*;
pub use site::*;


use anyhow::{bail, Context, Result};
use schemars::JsonSchema;
use serde::Deserialize;
use source::Source;
use std::path::PathBuf;

/// Behavior shared by all configuration sections.
pub trait ConfigModel {
    /// Normalize the model after loading, folding convenience fields into their canonical form.
    fn migrate(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The persisted lectern configuration model
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Configuration {
    #[serde(flatten)]
    pub core: Core,

    #[serde(default)]
    pub site: Site,

    #[serde(default)]
    pub build: Build,

    #[serde(default)]
    pub feed: Feed,

    #[serde(default)]
    pub serve: Serve,
}

impl ConfigModel for Configuration {
    /// Normalize all sections.
    ///
    /// Only the in-memory model changes, configuration files are never rewritten.
    fn migrate(&mut self) -> Result<()> {
        self.core.migrate()?;
        self.site.migrate()?;
        self.build.migrate()?;
        self.feed.migrate()?;
        self.serve.migrate()?;

        Ok(())
    }
}

/// Locate and load the configuration from an optional file or directory, falling back to the
/// current directory.
///
/// Returns the configuration together with the working directory all relative paths resolve
/// against.
pub async fn load(path: Option<PathBuf>) -> Result<(Configuration, PathBuf)> {
    match path {
        Some(path) if path.is_file() => load_file(path).await,
        // A directory gets the candidate scan.
        Some(path) if path.is_dir() => Ok((Source::find(&path)?.load().await?, path)),
        Some(path) => bail!("{} is neither a file nor a directory", path.display()),
        None => {
            let cwd = std::env::current_dir().context("unable to get current directory")?;
            Ok((Source::find(&cwd)?.load().await?, cwd))
        }
    }
}

/// Load an explicitly named configuration file, its parent becomes the working directory.
async fn load_file(path: PathBuf) -> Result<(Configuration, PathBuf)> {
    // Canonicalize first, a relative file name would yield a parent of '' which is useless as
    // a working directory.
    let path = path.canonicalize().with_context(|| {
        format!(
            "unable to canonicalize path to configuration: '{}'",
            path.display()
        )
    })?;
    let Some(cwd) = path.parent() else {
        bail!("unable to get parent directory of '{}'", path.display());
    };
    let cwd = cwd.to_path_buf();

    Ok((Source::File(path).load().await?, cwd))
}
