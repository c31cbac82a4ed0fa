use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The front matter of a content page.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FrontMatter {
    /// The page title. For blog posts this becomes the feed headline.
    pub title: Option<String>,
    /// The publication date. For blog posts this becomes the feed date.
    pub date: Option<time::Date>,
    /// Tags, joined into the feed keywords.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The publication status. Only `published` pages are generated.
    pub status: Option<String>,
    /// Any further keys become `$key$` placeholder values.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    pub fn is_published(&self) -> bool {
        self.status.as_deref() == Some("published")
    }

    /// The `$key$` placeholder values this front matter provides.
    pub fn placeholder_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        if let Some(title) = &self.title {
            values.insert("title".into(), title.clone());
        }
        if let Some(date) = &self.date {
            values.insert("date".into(), date.to_string());
        }
        if !self.tags.is_empty() {
            values.insert("tags".into(), self.tags.join(", "));
        }
        if let Some(status) = &self.status {
            values.insert("status".into(), status.clone());
        }
        for (key, value) in &self.extra {
            values.insert(key.clone(), scalar_to_string(value));
        }
        values
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

/// Split a raw page into front matter and body.
///
/// Front matter is the YAML between two `---` lines at the top of the file. A page without
/// front matter is all body.
pub fn extract(raw: &str) -> Result<(FrontMatter, &str)> {
    let Some(rest) = raw.strip_prefix("---") else {
        return Ok((FrontMatter::default(), raw));
    };
    let Some((matter, body)) = rest.split_once("\n---") else {
        return Ok((FrontMatter::default(), raw));
    };

    let front = if matter.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(matter).context("error parsing front matter")?
    };

    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);

    Ok((front, body))
}
