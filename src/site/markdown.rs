//! Markdown rendering with GitHub Flavored Markdown support.

use comrak::Options;

/// Render Markdown into an HTML fragment.
///
/// Uses comrak with the GFM extensions (tables, strikethrough, autolinks, task lists). Raw
/// inline HTML passes through unchanged, pages are trusted input.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.unsafe_ = true;
    comrak::markdown_to_html(markdown, &options)
}
