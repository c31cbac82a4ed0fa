//! Emission of the JSON-LD blog feed document.

use crate::config::rt::RtcBuild;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use time::Date;

/// The JSON-LD envelope of the blog feed.
#[derive(Debug, Serialize)]
struct BlogIndex<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "blogPost")]
    blog_post: &'a [BlogPosting],
}

/// A single post record of the blog feed.
#[derive(Clone, Debug, Serialize)]
pub struct BlogPosting {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub headline: String,
    pub url: String,
    #[serde(rename = "datePublished")]
    pub date_published: Date,
    pub keywords: String,
}

impl BlogPosting {
    pub fn new(headline: String, url: String, date_published: Date, keywords: String) -> Self {
        Self {
            kind: "BlogPosting",
            headline,
            url,
            date_published,
            keywords,
        }
    }
}

/// Write the feed document into the staging directory.
///
/// Returns the path of the written document, or `None` when there are no
/// posts, in which case no document is written at all.
pub async fn emit(cfg: &RtcBuild, posts: &[BlogPosting]) -> Result<Option<PathBuf>> {
    if posts.is_empty() {
        tracing::debug!("no published posts, skipping feed document");
        return Ok(None);
    }

    let index = BlogIndex {
        context: "https://schema.org",
        kind: "Blog",
        blog_post: posts,
    };
    let json = serde_json::to_vec_pretty(&index).context("error serializing feed document")?;

    let output = cfg.staging_dist.join(&cfg.feed_output);
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("error creating feed output dir {parent:?}"))?;
    }
    tokio::fs::write(&output, &json)
        .await
        .with_context(|| format!("error writing feed document {output:?}"))?;
    tracing::debug!(path = ?cfg.feed_output, posts = posts.len(), "wrote feed document");
    Ok(Some(output))
}
