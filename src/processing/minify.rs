use anyhow::{Context, Result};
use std::path::Path;

/// perform HTML minification, including inline CSS and JS
pub fn minify_html(bytes: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.minify_css = true;
    cfg.minify_js = true;
    minify_html::minify(bytes, &cfg)
}

/// Minify a generated page in place.
#[tracing::instrument(level = "trace")]
pub async fn minify_file(path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("error reading page {path:?}"))?;
    // minification is CPU bound
    let minified = tokio::task::spawn_blocking(move || minify_html(&bytes))
        .await
        .context("error awaiting minification")?;
    tokio::fs::write(path, minified)
        .await
        .with_context(|| format!("error writing minified page {path:?}"))?;
    Ok(())
}
