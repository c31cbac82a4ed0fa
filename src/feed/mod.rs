//! Feed document emission and post list generation.

pub mod emit;
pub mod fetch;
pub mod render;

use crate::common::html_rewrite::Document;
use crate::config::FeedSource;
use crate::config::rt::RtcBuild;
use anyhow::{Context, Result};
use fetch::{FeedError, FeedPayload};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

/// The feed document, as read back for list generation.
///
/// Additional JSON-LD vocabulary in the document is ignored.
#[derive(Debug, Deserialize)]
pub struct FeedDocument {
    #[serde(rename = "blogPost")]
    pub blog_post: Vec<PostEntry>,
}

/// A single post entry of the feed document.
#[derive(Debug, Deserialize)]
pub struct PostEntry {
    pub url: String,
    pub headline: String,
}

/// The outcome of the feed list stage.
#[derive(Debug, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The post list was appended to the container of the given pages.
    Rendered { pages: usize, entries: usize },
    /// There was no feed document, the pages were left untouched.
    Skipped,
}

/// The feed list stage: fetches the feed document and appends the post list to
/// the container element of the generated pages.
pub struct FeedList {
    /// Runtime build config.
    cfg: Arc<RtcBuild>,
}

impl FeedList {
    pub fn new(cfg: Arc<RtcBuild>) -> Self {
        Self { cfg }
    }

    /// Run the feed list stage over the given pages.
    ///
    /// Failures are logged and never escalate into a build failure, a page
    /// without a post list is still a valid page.
    #[tracing::instrument(level = "trace", skip(self, pages))]
    pub async fn run(&self, pages: &[PathBuf]) -> FeedOutcome {
        match self.try_run(pages).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("error rendering feed list: {err:#}");
                FeedOutcome::Skipped
            }
        }
    }

    async fn try_run(&self, pages: &[PathBuf]) -> Result<FeedOutcome> {
        if self.cfg.offline && matches!(self.cfg.feed_source, FeedSource::Url(_)) {
            tracing::warn!(
                "offline build, skipping feed list from {}",
                self.cfg.feed_source
            );
            return Ok(FeedOutcome::Skipped);
        }

        let payload = fetch::fetch(&self.cfg.feed_source, &self.cfg.staging_dist).await?;
        let bytes = match payload {
            FeedPayload::Content(bytes) => bytes,
            FeedPayload::Absent => {
                tracing::info!("feed document not found, skipping list generation");
                return Ok(FeedOutcome::Skipped);
            }
        };

        let feed: FeedDocument = serde_json::from_slice(&bytes).map_err(FeedError::Parse)?;
        let list = render::render_list(&feed);
        let selector = format!("[id=\"{}\"]", self.cfg.feed_container);

        let mut rendered = 0;
        for page in pages {
            let raw = fs::read(page)
                .await
                .with_context(|| format!("error reading page {page:?}"))?;
            let mut document = Document::new(raw);
            if document.len(&selector)? == 0 {
                continue;
            }
            document
                .append_html(&selector, &list)
                .with_context(|| format!("error appending post list to {page:?}"))?;
            fs::write(page, document.into_inner())
                .await
                .with_context(|| format!("error writing page {page:?}"))?;
            rendered += 1;
        }

        if rendered == 0 {
            return Err(FeedError::NoContainer(self.cfg.feed_container.clone()).into());
        }

        tracing::debug!(
            pages = rendered,
            entries = feed.blog_post.len(),
            "appended post list"
        );
        Ok(FeedOutcome::Rendered {
            pages: rendered,
            entries: feed.blog_post.len(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::ensure;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::net::SocketAddr;
    use tokio::task::JoinHandle;
    use url::Url;

    const FEED_JSON: &str = r#"{
        "@context": "https://schema.org",
        "@type": "Blog",
        "blogPost": [
            {
                "@type": "BlogPosting",
                "headline": "First Post",
                "url": "first-post.html",
                "datePublished": "2024-08-25",
                "keywords": ""
            },
            {
                "@type": "BlogPosting",
                "headline": "Second Post",
                "url": "second-post.html",
                "datePublished": "2024-08-26",
                "keywords": "rust"
            }
        ]
    }"#;

    const BLOG_PAGE: &str = r#"<html><body><div id="list-items"></div></body></html>"#;

    async fn setup() -> Result<(tempfile::TempDir, RtcBuild, PathBuf)> {
        let tmpdir = tempfile::tempdir().context("error creating temp dir")?;
        let cfg = RtcBuild::new_test(tmpdir.path()).await?;
        let page = cfg.staging_dist.join("index.html");
        fs::write(&page, BLOG_PAGE).await?;
        Ok((tmpdir, cfg, page))
    }

    async fn write_feed(cfg: &RtcBuild, json: &str) -> Result<()> {
        fs::create_dir_all(cfg.staging_dist.join("blog")).await?;
        fs::write(cfg.staging_dist.join("blog").join("schema.json"), json).await?;
        Ok(())
    }

    async fn spawn_test_server(router: Router) -> Result<(SocketAddr, JoinHandle<()>)> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("error binding test server")?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok((addr, handle))
    }

    fn url_source(addr: SocketAddr) -> Result<FeedSource> {
        Ok(FeedSource::Url(Url::parse(&format!(
            "http://{addr}/schema.json"
        ))?))
    }

    #[tokio::test]
    async fn ok_render_list_from_file() -> Result<()> {
        // Assemble.
        let (_tmpdir, cfg, page) = setup().await?;
        write_feed(&cfg, FEED_JSON).await?;

        // Action.
        let outcome = FeedList::new(Arc::new(cfg)).run(&[page.clone()]).await;

        // Assert.
        assert_eq!(
            outcome,
            FeedOutcome::Rendered {
                pages: 1,
                entries: 2
            }
        );
        let html = fs::read_to_string(&page).await?;
        let first = html.find("First Post").context("first post must be listed")?;
        let second = html
            .find("Second Post")
            .context("second post must be listed")?;
        ensure!(first < second, "posts must keep the feed order");
        ensure!(
            html.contains(r#"href="first&#x2D;post&#x2E;html""#),
            "links must point at the posts: {html}"
        );
        ensure!(
            html.contains(r#"<div id="list-items"><ul>"#),
            "the container must gain the list as a child: {html}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn ok_render_list_from_url() -> Result<()> {
        // Assemble.
        let (_tmpdir, mut cfg, page) = setup().await?;
        let router = Router::new().route("/schema.json", get(|| async { FEED_JSON }));
        let (addr, server) = spawn_test_server(router).await?;
        cfg.feed_source = url_source(addr)?;

        // Action.
        let outcome = FeedList::new(Arc::new(cfg)).run(&[page]).await;

        // Assert.
        server.abort();
        assert_eq!(
            outcome,
            FeedOutcome::Rendered {
                pages: 1,
                entries: 2
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn skip_without_feed_document() -> Result<()> {
        // Assemble.
        let (_tmpdir, mut cfg, page) = setup().await?;
        let (addr, server) = spawn_test_server(Router::new()).await?;
        cfg.feed_source = url_source(addr)?;

        // Action.
        let outcome = FeedList::new(Arc::new(cfg)).run(&[page.clone()]).await;

        // Assert.
        server.abort();
        assert_eq!(outcome, FeedOutcome::Skipped);
        assert_eq!(fs::read_to_string(&page).await?, BLOG_PAGE);
        Ok(())
    }

    #[tokio::test]
    async fn err_on_server_error_is_contained() -> Result<()> {
        // Assemble.
        let (_tmpdir, mut cfg, page) = setup().await?;
        let router = Router::new().route(
            "/schema.json",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let (addr, server) = spawn_test_server(router).await?;
        cfg.feed_source = url_source(addr)?;
        let list = FeedList::new(Arc::new(cfg));

        // Action.
        let err = list
            .try_run(&[page.clone()])
            .await
            .err()
            .context("a server error must surface")?;
        let outcome = list.run(&[page.clone()]).await;

        // Assert.
        server.abort();
        ensure!(
            matches!(
                err.downcast_ref::<FeedError>(),
                Some(FeedError::Http(status)) if *status == StatusCode::INTERNAL_SERVER_ERROR
            ),
            "unexpected error: {err:?}"
        );
        assert_eq!(outcome, FeedOutcome::Skipped);
        assert_eq!(fs::read_to_string(&page).await?, BLOG_PAGE);
        Ok(())
    }

    #[tokio::test]
    async fn err_on_invalid_feed_document() -> Result<()> {
        // Assemble.
        let (_tmpdir, cfg, page) = setup().await?;
        write_feed(&cfg, "schema dot json").await?;
        let list = FeedList::new(Arc::new(cfg));

        // Action.
        let err = list
            .try_run(&[page])
            .await
            .err()
            .context("an unparsable document must surface")?;

        // Assert.
        ensure!(
            matches!(err.downcast_ref::<FeedError>(), Some(FeedError::Parse(_))),
            "unexpected error: {err:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn err_on_missing_entry_field() -> Result<()> {
        // Assemble.
        let (_tmpdir, cfg, page) = setup().await?;
        write_feed(&cfg, r#"{"blogPost": [{"headline": "First Post"}]}"#).await?;
        let list = FeedList::new(Arc::new(cfg));

        // Action.
        let err = list
            .try_run(&[page])
            .await
            .err()
            .context("an entry without url must surface")?;

        // Assert.
        ensure!(
            matches!(err.downcast_ref::<FeedError>(), Some(FeedError::Parse(_))),
            "unexpected error: {err:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn err_without_container() -> Result<()> {
        // Assemble.
        let (_tmpdir, cfg, _page) = setup().await?;
        write_feed(&cfg, FEED_JSON).await?;
        let bare = cfg.staging_dist.join("bare.html");
        fs::write(&bare, "<html><body></body></html>").await?;
        let list = FeedList::new(Arc::new(cfg));

        // Action.
        let err = list
            .try_run(&[bare])
            .await
            .err()
            .context("a missing container must surface")?;

        // Assert.
        ensure!(
            matches!(
                err.downcast_ref::<FeedError>(),
                Some(FeedError::NoContainer(id)) if id == "list-items"
            ),
            "unexpected error: {err:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn renders_into_every_page_with_container() -> Result<()> {
        // Assemble.
        let (_tmpdir, cfg, page) = setup().await?;
        write_feed(&cfg, FEED_JSON).await?;
        let second = cfg.staging_dist.join("blog").join("index.html");
        fs::write(&second, BLOG_PAGE).await?;
        let bare = cfg.staging_dist.join("bare.html");
        fs::write(&bare, "<html><body></body></html>").await?;

        // Action.
        let outcome = FeedList::new(Arc::new(cfg))
            .run(&[page, second.clone(), bare.clone()])
            .await;

        // Assert.
        assert_eq!(
            outcome,
            FeedOutcome::Rendered {
                pages: 2,
                entries: 2
            }
        );
        ensure!(
            fs::read_to_string(&second).await?.contains("First Post"),
            "the list must land in every page with a container"
        );
        assert_eq!(
            fs::read_to_string(&bare).await?,
            "<html><body></body></html>"
        );
        Ok(())
    }

    #[tokio::test]
    async fn ok_empty_feed_document() -> Result<()> {
        // Assemble.
        let (_tmpdir, cfg, page) = setup().await?;
        write_feed(&cfg, r#"{"blogPost": []}"#).await?;

        // Action.
        let outcome = FeedList::new(Arc::new(cfg)).run(&[page.clone()]).await;

        // Assert.
        assert_eq!(
            outcome,
            FeedOutcome::Rendered {
                pages: 1,
                entries: 0
            }
        );
        assert_eq!(
            fs::read_to_string(&page).await?,
            r#"<html><body><div id="list-items"><ul></ul></div></body></html>"#
        );
        Ok(())
    }

    #[tokio::test]
    async fn custom_container_id() -> Result<()> {
        // Assemble.
        let (_tmpdir, mut cfg, _page) = setup().await?;
        write_feed(&cfg, FEED_JSON).await?;
        cfg.feed_container = "post-list".into();
        let page = cfg.staging_dist.join("posts.html");
        fs::write(&page, r#"<html><body><div id="post-list"></div></body></html>"#).await?;

        // Action.
        let outcome = FeedList::new(Arc::new(cfg)).run(&[page.clone()]).await;

        // Assert.
        assert_eq!(
            outcome,
            FeedOutcome::Rendered {
                pages: 1,
                entries: 2
            }
        );
        ensure!(
            fs::read_to_string(&page).await?.contains("First Post"),
            "the configured container must receive the list"
        );
        Ok(())
    }

    #[tokio::test]
    async fn skip_url_source_when_offline() -> Result<()> {
        // Assemble.
        let (_tmpdir, mut cfg, page) = setup().await?;
        cfg.offline = true;
        cfg.feed_source = FeedSource::Url(Url::parse("http://127.0.0.1:9/schema.json")?);

        // Action.
        let outcome = FeedList::new(Arc::new(cfg)).run(&[page]).await;

        // Assert.
        assert_eq!(outcome, FeedOutcome::Skipped);
        Ok(())
    }
}
