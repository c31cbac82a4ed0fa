use crate::config::{Configuration, models::ConfigModel};
use anyhow::{Context, bail};
use std::path::{Path, PathBuf};

/// A configuration source
pub enum Source {
    /// A configuration file (TOML, YAML or JSON)
    File(PathBuf),
    /// No configuration file, the defaults apply
    Defaults,
}

const CANDIDATES: &[&str] = &[
    // Lectern.toml goes first, as it is the documented default
    "Lectern.toml",
    ".lectern.toml",
    "Lectern.yaml",
    ".lectern.yaml",
    "Lectern.json",
    ".lectern.json",
];

impl Source {
    /// Find the first config file candidate in a directory.
    pub fn find(dir: &Path) -> anyhow::Result<Source> {
        for name in CANDIDATES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(Source::File(candidate));
            }
        }

        // A site with the standard layout needs no configuration file at all
        Ok(Source::Defaults)
    }

    /// Load the configuration from the source and normalize it.
    pub async fn load(self) -> anyhow::Result<Configuration> {
        let mut cfg = match self {
            Self::File(file) => load_from(&file).await?,
            Self::Defaults => Configuration::default(),
        };
        cfg.migrate()?;
        Ok(cfg)
    }
}

/// Load configuration from a file, dispatching on the file extension.
async fn load_from(file: &Path) -> anyhow::Result<Configuration> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("error reading configuration file {file:?}"))?;

    match file.extension().map(|s| s.to_string_lossy()).as_deref() {
        Some("toml") => Ok(toml::from_str(std::str::from_utf8(&data)?)?),
        Some("yaml") => Ok(serde_yaml::from_slice(&data)?),
        Some("json") => Ok(serde_json::from_slice(&data)?),
        Some(other) => bail!("unsupported configuration file type: {other}"),
        None => bail!("missing configuration file extension"),
    }
}
