use super::super::STAGE_DIR;
use crate::config::rt::RtcCore;
use crate::config::{Configuration, FeedSource, Minify};
use anyhow::Context;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Runtime config for the build system.
#[derive(Clone, Debug)]
pub struct RtcBuild {
    pub core: Arc<RtcCore>,
    /// The directory holding the page content.
    pub content_dir: PathBuf,
    /// The directory holding the page templates.
    pub template_dir: PathBuf,
    /// The directory copied into the output as-is.
    pub static_dir: PathBuf,
    /// Additional values for `$key$` placeholders, taking precedence over front matter values.
    pub properties: HashMap<String, String>,
    /// Build in release mode.
    pub release: bool,
    /// Build without network access.
    pub offline: bool,
    /// The directory where final build artifacts are placed after a successful build.
    pub final_dist: PathBuf,
    /// The directory used to stage build artifacts during an active build.
    pub staging_dist: PathBuf,
    /// Control minification.
    pub minify: Minify,
    /// Where the feed index is written, relative to the staging dir.
    pub feed_output: PathBuf,
    /// Where the feed list stage reads the feed from.
    pub feed_source: FeedSource,
    /// The id of the element receiving the post list.
    pub feed_container: String,
}

impl RtcBuild {
    /// Construct a new instance.
    pub(crate) fn new(config: Configuration, working_directory: PathBuf) -> anyhow::Result<Self> {
        let Configuration {
            core,
            site,
            build,
            feed,
            serve: _,
        } = config;

        let core = Arc::new(RtcCore::new(core, working_directory));

        let resolve = |path: PathBuf| -> PathBuf {
            if path.is_absolute() {
                path
            } else {
                core.working_directory.join(path)
            }
        };

        let content_dir = resolve(site.content);
        let template_dir = resolve(site.templates);
        let static_dir = resolve(site.static_dir);

        // Ensure the final dist dir exists and that we have a canonical path to the dir. Normally
        // we would want to avoid such an action at this layer, however to ensure that other layers
        // have a reliable FS path to work with, we make an exception here.
        let final_dist = resolve(build.dist);
        if !final_dist.exists() {
            std::fs::create_dir_all(&final_dist)
                .with_context(|| format!("error creating final dist directory {:?}", &final_dist))?;
        }
        let final_dist = final_dist
            .canonicalize()
            .context("error taking canonical path to dist dir")?;
        let staging_dist = final_dist.join(STAGE_DIR);

        // The list stage reads back what the feed emitter wrote, unless pointed elsewhere.
        let feed_source = feed
            .source
            .unwrap_or_else(|| FeedSource::Path(feed.output.clone()));

        Ok(Self {
            core,
            content_dir,
            template_dir,
            static_dir,
            properties: site.properties,
            release: build.release,
            offline: build.offline,
            final_dist,
            staging_dist,
            minify: build.minify,
            feed_output: feed.output,
            feed_source,
            feed_container: feed.container,
        })
    }

    /// Construct a new instance for testing.
    #[cfg(test)]
    pub async fn new_test(tmpdir: &std::path::Path) -> anyhow::Result<Self> {
        let content_dir = tmpdir.join("content");
        let template_dir = tmpdir.join("templates");
        let static_dir = tmpdir.join("static");
        let final_dist = tmpdir.join("dist");
        let staging_dist = final_dist.join(".stage");
        tokio::fs::create_dir_all(&staging_dist)
            .await
            .context("error creating dist & staging dir for test")?;
        tokio::fs::create_dir_all(&content_dir)
            .await
            .context("error creating content dir for test")?;
        tokio::fs::create_dir_all(&template_dir)
            .await
            .context("error creating template dir for test")?;
        Ok(Self {
            core: Arc::new(RtcCore::new_test()),
            content_dir,
            template_dir,
            static_dir,
            properties: Default::default(),
            release: false,
            offline: false,
            final_dist,
            staging_dist,
            minify: Minify::Never,
            feed_output: PathBuf::from("blog").join("schema.json"),
            feed_source: FeedSource::Path(PathBuf::from("blog").join("schema.json")),
            feed_container: "list-items".into(),
        })
    }

    /// Evaluate the global minify state.
    pub fn should_minify(&self) -> bool {
        match (self.minify, self.release) {
            (Minify::Never, _) => false,
            (Minify::OnRelease, release) => release,
            (Minify::Always, _) => true,
        }
    }
}
