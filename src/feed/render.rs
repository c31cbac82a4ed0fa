//! Rendering of the post list markup.

use super::FeedDocument;

/// Render the feed document as one `<ul>` fragment with a link item per post,
/// ready to be appended into the configured container element.
///
/// Items keep the order of the feed document. An empty document still renders
/// the bare list.
pub fn render_list(feed: &FeedDocument) -> String {
    let items = feed
        .blog_post
        .iter()
        .map(|entry| {
            format!(
                r#"<li><a href="{}">{}</a></li>"#,
                htmlescape::encode_attribute(&entry.url),
                htmlescape::encode_minimal(&entry.headline),
            )
        })
        .collect::<String>();
    format!("<ul>{items}</ul>")
}
