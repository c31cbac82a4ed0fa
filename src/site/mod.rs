//! Site generation: content pages, templates and front matter.

pub mod front_matter;
pub mod markdown;
pub mod template;

use crate::common::{path_exists, strip_prefix, title_case};
use crate::config::rt::RtcBuild;
use crate::feed::emit::BlogPosting;
use anyhow::{Context, Result};
use front_matter::FrontMatter;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use template::Templates;
use time::OffsetDateTime;
use tokio::fs;
use tokio::task::JoinHandle;

/// Recursively collect the content pages of the site, in deterministic order.
pub async fn collect_pages(cfg: Arc<RtcBuild>, templates: Arc<Templates>) -> Result<Vec<Page>> {
    if !path_exists(&cfg.content_dir).await? {
        tracing::warn!(
            "content directory {:?} not found, nothing to generate",
            strip_prefix(&cfg.content_dir)
        );
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    collect_sources(cfg.content_dir.clone(), &mut sources).await?;
    sources.sort();

    let mut pages = Vec::new();
    for source in sources {
        if let Some(page) = Page::new(cfg.clone(), templates.clone(), source)? {
            pages.push(page);
        }
    }
    Ok(pages)
}

async fn collect_sources(dir: PathBuf, sources: &mut Vec<PathBuf>) -> Result<()> {
    let mut read_dir = fs::read_dir(&dir)
        .await
        .with_context(|| format!("error reading content dir {dir:?}"))?;
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .context("error reading next content dir entry")?
    {
        if entry.file_type().await?.is_dir() {
            Box::pin(collect_sources(entry.path(), sources)).await?;
        } else {
            sources.push(entry.path());
        }
    }
    Ok(())
}

/// How a content file turns into a page body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PageKind {
    /// Rendered from Markdown.
    Markdown,
    /// Passed through as-is.
    Html,
}

impl PageKind {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "md" => Some(Self::Markdown),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// A single content page of the site.
pub struct Page {
    /// Runtime build config.
    cfg: Arc<RtcBuild>,
    /// The shared template set.
    templates: Arc<Templates>,
    /// The content source file.
    source: PathBuf,
    /// The source path relative to the content dir.
    rel_path: PathBuf,
    /// How the page body is turned into HTML.
    kind: PageKind,
}

/// The output of a rendered page.
pub struct PageOutput {
    /// The staged output file.
    pub path: PathBuf,
    /// The feed record, when the page is a blog post.
    pub posting: Option<BlogPosting>,
}

impl Page {
    /// Create a new page pipeline, returning `None` for files which are not pages.
    pub fn new(
        cfg: Arc<RtcBuild>,
        templates: Arc<Templates>,
        source: PathBuf,
    ) -> Result<Option<Self>> {
        let Some(kind) = PageKind::from_path(&source) else {
            return Ok(None);
        };
        let rel_path = source
            .strip_prefix(&cfg.content_dir)
            .with_context(|| format!("source {source:?} is not inside the content dir"))?
            .to_path_buf();
        Ok(Some(Self {
            cfg,
            templates,
            source,
            rel_path,
            kind,
        }))
    }

    /// Spawn the task rendering this page.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn spawn(self) -> JoinHandle<Result<Option<PageOutput>>> {
        tokio::spawn(self.run())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn run(self) -> Result<Option<PageOutput>> {
        let raw = fs::read_to_string(&self.source)
            .await
            .with_context(|| format!("error reading content file {:?}", self.source))?;
        let (front, body) = front_matter::extract(&raw)
            .with_context(|| format!("error in front matter of {:?}", self.rel_path))?;

        if !front.is_published() {
            tracing::debug!(path = ?self.rel_path, "page is not published, skipping");
            return Ok(None);
        }

        let body = match self.kind {
            PageKind::Markdown => markdown::to_html(body),
            PageKind::Html => body.to_owned(),
        };

        let stem = self
            .rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .with_context(|| format!("missing file stem for {:?}", self.rel_path))?;
        let section = self
            .rel_path
            .parent()
            .and_then(|path| path.file_name())
            .map(|s| s.to_string_lossy().into_owned());

        let mut values = front.placeholder_values();
        // Configured properties win over front matter values.
        values.extend(
            self.cfg
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        let html = self
            .templates
            .render(&stem, section.as_deref(), &values, &body)
            .with_context(|| format!("error rendering page {:?}", self.rel_path))?;

        let rel_output = self.rel_path.with_extension("html");
        let output = self.cfg.staging_dist.join(&rel_output);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("error creating output dir {parent:?}"))?;
        }
        fs::write(&output, &html)
            .await
            .with_context(|| format!("error writing page {output:?}"))?;
        tracing::debug!(path = ?rel_output, "rendered page");

        let posting = self.blog_posting(&front, &stem);
        Ok(Some(PageOutput {
            path: output,
            posting,
        }))
    }

    /// The feed record for this page, if it is a blog post.
    fn blog_posting(&self, front: &FrontMatter, stem: &str) -> Option<BlogPosting> {
        if stem.eq_ignore_ascii_case("index") || !self.in_blog_section() {
            return None;
        }

        let headline = front.title.clone().unwrap_or_else(|| title_case(stem));
        let date = front.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());

        Some(BlogPosting::new(
            headline,
            format!("{stem}.html"),
            date,
            front.tags.join(", "),
        ))
    }

    /// A page is a blog post when one of its directories is named `blog`.
    fn in_blog_section(&self) -> bool {
        let Some(parent) = self.rel_path.parent() else {
            return false;
        };
        parent.components().any(|component| {
            matches!(component, Component::Normal(name) if name.eq_ignore_ascii_case("blog"))
        })
    }
}
