//! Build system & site generation stages.

use crate::common::{BUILDING, ERROR, SUCCESS, copy_dir_recursive, path_exists_and, remove_dir_all};
use crate::config::STAGE_DIR;
use crate::config::rt::RtcBuild;
use crate::feed::{FeedList, emit};
use crate::processing::minify::minify_file;
use crate::site;
use crate::site::PageOutput;
use crate::site::template::Templates;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

/// A system used for building the site and all of its assets.
///
/// This unit of data should be used throughout the system for driving build
/// processes. CLI commands which need to trigger builds in some way should be
/// able to create an instance of this struct, and then the build routines stay
/// cleanly abstracted away from any specific CLI endpoints.
pub struct BuildSystem {
    /// Runtime build config.
    cfg: Arc<RtcBuild>,
}

impl BuildSystem {
    /// Create a new instance.
    pub async fn new(cfg: Arc<RtcBuild>) -> Result<Self> {
        Ok(Self { cfg })
    }

    /// Build the site described by the runtime config.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn build(&mut self) -> Result<()> {
        tracing::info!("{}starting build", BUILDING);
        match self.build_site().await {
            Ok(()) => {
                tracing::info!("{}success", SUCCESS);
                Ok(())
            }
            Err(err) => {
                tracing::error!("{}error during build", ERROR);
                Err(err)
            }
        }
    }

    async fn build_site(&mut self) -> Result<()> {
        self.prepare_staging_dist().await?;
        self.copy_static_dir().await?;

        let (pages, postings) = self.generate_pages().await?;

        emit::emit(&self.cfg, &postings).await?;
        FeedList::new(self.cfg.clone()).run(&pages).await;

        if self.cfg.should_minify() {
            for page in &pages {
                minify_file(page).await?;
            }
        }

        self.move_stage_to_dist().await?;
        Ok(())
    }

    /// Prepare a clean staging area for the new build.
    async fn prepare_staging_dist(&self) -> Result<()> {
        remove_dir_all(self.cfg.staging_dist.clone())
            .await
            .context("error cleaning staging dist dir")?;
        fs::create_dir_all(&self.cfg.staging_dist)
            .await
            .context("error creating staging dist dir")?;
        Ok(())
    }

    /// Copy the static dir into the staging area, if present.
    async fn copy_static_dir(&self) -> Result<()> {
        if !path_exists_and(&self.cfg.static_dir, |m| m.is_dir()).await? {
            tracing::info!("static directory not found, skipping copy");
            return Ok(());
        }
        let canonical = fs::canonicalize(&self.cfg.static_dir)
            .await
            .with_context(|| {
                format!(
                    "error taking canonical path of static dir {:?}",
                    self.cfg.static_dir
                )
            })?;
        // The destination keeps the fixed name, templates reference assets as `static/...`.
        let copied = copy_dir_recursive(canonical, self.cfg.staging_dist.join("static"))
            .await
            .context("error copying static dir to staging dir")?;
        tracing::debug!("copied {copied} static files");
        Ok(())
    }

    /// Render all content pages into the staging area.
    async fn generate_pages(&self) -> Result<(Vec<PathBuf>, Vec<emit::BlogPosting>)> {
        let templates = Arc::new(Templates::load(&self.cfg.template_dir).await?);
        let pages = site::collect_pages(self.cfg.clone(), templates).await?;

        let mut handles = Vec::with_capacity(pages.len());
        for page in pages {
            handles.push(page.spawn());
        }

        let mut paths = Vec::new();
        let mut postings = Vec::new();
        for handle in handles {
            if let Some(PageOutput { path, posting }) =
                handle.await.context("error joining page render task")??
            {
                if let Some(posting) = posting {
                    postings.push(posting);
                }
                paths.push(path);
            }
        }
        Ok((paths, postings))
    }

    async fn move_stage_to_dist(&self) -> Result<()> {
        let final_dist = &self.cfg.final_dist;
        let staging_dist = &self.cfg.staging_dist;

        // Clean the final dist, excluding the staging dist.
        let mut entries = fs::read_dir(final_dist)
            .await
            .context("error reading final dist dir")?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("error reading next entry of final dist dir")?
        {
            if entry.file_name() == STAGE_DIR {
                continue;
            }
            if entry.file_type().await?.is_dir() {
                remove_dir_all(entry.path()).await?;
            } else {
                fs::remove_file(entry.path())
                    .await
                    .with_context(|| format!("error removing file {:?}", entry.path()))?;
            }
        }

        // Move the contents of the staging dist into the final dist.
        let mut entries = fs::read_dir(staging_dist)
            .await
            .context("error reading staging dist dir")?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("error reading next entry of staging dist dir")?
        {
            let target = final_dist.join(entry.file_name());
            fs::rename(entry.path(), &target)
                .await
                .with_context(|| format!("error moving {:?} to {:?}", entry.path(), target))?;
        }

        // Remove the staging dist.
        remove_dir_all(staging_dist.clone())
            .await
            .context("error removing staging dist dir")?;
        Ok(())
    }
}
