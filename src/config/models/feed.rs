use crate::config::models::ConfigModel;
use anyhow::Context;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Config options for the post feed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Feed {
    /// Where the feed index is written, relative to the output dir [default: blog/schema.json]
    #[serde(default = "default::output")]
    pub output: PathBuf,

    /// Where the feed list stage reads the feed from [default: the `output` path]
    ///
    /// Either an http(s) URL, or a path relative to the output dir.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub source: Option<FeedSource>,

    /// The id of the element receiving the post list [default: list-items]
    #[serde(default = "default::container")]
    pub container: String,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            output: default::output(),
            source: None,
            container: default::container(),
        }
    }
}

impl ConfigModel for Feed {}

mod default {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        PathBuf::from("blog").join("schema.json")
    }

    pub fn container() -> String {
        "list-items".into()
    }
}

/// The location a post feed is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedSource {
    /// An http(s) URL, fetched over the network.
    Url(Url),
    /// A path relative to the output dir. Absolute paths are used as-is.
    Path(PathBuf),
}

impl FromStr for FeedSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(Url::parse(s).with_context(|| {
                format!("invalid feed source URL '{s}'")
            })?))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url.as_str()),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl<'de> Deserialize<'de> for FeedSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn source_from_url() {
        let source: FeedSource = "https://example.com/blog/schema.json"
            .parse()
            .expect("URL must parse");
        assert!(matches!(source, FeedSource::Url(_)));
    }

    #[test]
    fn source_from_relative_path() {
        let source: FeedSource = "blog/schema.json".parse().expect("path must parse");
        assert_eq!(source, FeedSource::Path("blog/schema.json".into()));
    }

    #[test]
    fn err_source_from_invalid_url() {
        assert!("https://".parse::<FeedSource>().is_err());
    }
}
