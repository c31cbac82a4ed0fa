use crate::config::models::ConfigModel;
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Config options for the site content.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Site {
    /// The directory holding the page content [default: content]
    ///
    /// Markdown files (`.md`) are rendered, HTML files (`.html`) pass through as-is. Anything
    /// else is ignored.
    #[serde(default = "default::content", alias = "content_dir")]
    pub content: PathBuf,

    /// The directory holding the page templates [default: templates]
    #[serde(default = "default::templates", alias = "template_dir")]
    pub templates: PathBuf,

    /// The directory copied into the output as-is [default: static]
    #[serde(default = "default::static_dir", rename = "static", alias = "static_dir")]
    pub static_dir: PathBuf,

    /// Additional values for `$key$` placeholders, available to all pages.
    ///
    /// These take precedence over values coming from a page's front matter.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            content: default::content(),
            templates: default::templates(),
            static_dir: default::static_dir(),
            properties: Default::default(),
        }
    }
}

impl ConfigModel for Site {}

mod default {
    use std::path::PathBuf;

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn static_dir() -> PathBuf {
        "static".into()
    }
}
