use crate::common::path_exists;
use anyhow::{anyhow, Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// The name of the fallback template.
const DEFAULT_TEMPLATE: &str = "index";

/// The placeholder receiving the rendered page body.
const BODY_PLACEHOLDER: &str = "$body$";

/// Standard front matter placeholders, scrubbed from the output when a page does not set them.
const STANDARD_KEYS: &[&str] = &["title", "date", "tags", "status"];

/// The set of page templates of a site.
///
/// Templates are plain HTML files with `$key$` placeholders. Any template can be spliced into
/// another one with a `$<stem>$` placeholder, one level deep.
#[derive(Debug, Default)]
pub struct Templates {
    templates: HashMap<String, String>,
}

impl Templates {
    /// Load all `.html` files of the template directory.
    pub async fn load(template_dir: &Path) -> Result<Self> {
        if !path_exists(template_dir).await? {
            tracing::warn!("template directory {:?} not found", template_dir);
            return Ok(Self::default());
        }

        let mut templates = HashMap::new();
        let mut read_dir = tokio::fs::read_dir(template_dir)
            .await
            .with_context(|| format!("error reading template dir {template_dir:?}"))?;
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .context("error reading next template dir entry")?
        {
            let path = entry.path();
            if !path.extension().map(|ext| ext == "html").unwrap_or(false) {
                continue;
            }
            if let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) {
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("error reading template {path:?}"))?;
                templates.insert(stem, content);
            }
        }

        Ok(Self { templates })
    }

    /// Select the template for a page: one named like the page, else one named like the page's
    /// directory, else the `index` default.
    fn select(&self, stem: &str, section: Option<&str>) -> Result<(&str, &str)> {
        if let Some((name, content)) = self.templates.get_key_value(stem) {
            return Ok((name.as_str(), content.as_str()));
        }
        if let Some(section) = section {
            if let Some((name, content)) = self.templates.get_key_value(section) {
                return Ok((name.as_str(), content.as_str()));
            }
        }
        self.templates
            .get_key_value(DEFAULT_TEMPLATE)
            .map(|(name, content)| (name.as_str(), content.as_str()))
            .ok_or_else(|| {
                anyhow!(
                    "no template found for page '{stem}', and there is no '{DEFAULT_TEMPLATE}.html' fallback"
                )
            })
    }

    /// Splice `$<stem>$` template placeholders into the selected template.
    ///
    /// The active template itself is excluded, a template cannot include itself.
    fn splice(&self, active: &str, content: &str) -> String {
        let mut out = content.to_owned();
        for (name, template) in &self.templates {
            if name == active {
                continue;
            }
            let placeholder = format!("${name}$");
            if out.contains(&placeholder) {
                out = out.replace(&placeholder, template);
            }
        }
        out
    }

    /// Render a page body through its template.
    ///
    /// Value placeholders are replaced before the body is inserted, so placeholders appearing
    /// in the page content itself stay literal.
    pub fn render(
        &self,
        stem: &str,
        section: Option<&str>,
        values: &BTreeMap<String, String>,
        body: &str,
    ) -> Result<String> {
        let (name, content) = self.select(stem, section)?;
        let mut out = self.splice(name, content);

        for (key, value) in values {
            out = out.replace(&format!("${key}$"), value);
        }
        // Scrub standard placeholders the page did not set.
        for key in STANDARD_KEYS {
            out = out.replace(&format!("${key}$"), "");
        }

        Ok(out.replace(BODY_PLACEHOLDER, body))
    }
}
