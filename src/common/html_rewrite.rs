use anyhow::Result;
use lol_html::{element, html_content::ContentType, HtmlRewriter, Settings};

/// A wrapper for HTML modifications and rewrites.
#[derive(Debug)]
pub struct Document(Vec<u8>);

impl AsRef<[u8]> for Document {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Document {
    /// Create a new document
    ///
    /// Note: if this is not a valid HTML document, it will fail later on.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    /// Append an HTML fragment to the content of every element matching the selector.
    ///
    /// The content of the document will be replaced with the output of the operation. Will
    /// silently fail when attempting to append to a
    /// [Void Element](https://developer.mozilla.org/en-US/docs/Glossary/Void_element).
    pub fn append_html(&mut self, selector: &str, html: &str) -> Result<()> {
        let mut buf = Vec::new();
        HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!(selector, |el| {
                    el.append(html, ContentType::Html);
                    Ok(())
                })],
                ..Settings::default()
            },
            |out: &[u8]| buf.extend_from_slice(out),
        )
        .write(self.0.as_slice())?;

        self.0 = buf;

        Ok(())
    }

    /// Count the elements matching the provided selector.
    pub fn len(&self, selector: &str) -> Result<usize> {
        let mut len = 0;
        HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!(selector, |_el| {
                    len += 1;
                    Ok(())
                })],
                ..Settings::default()
            },
            |_: &[u8]| {},
        )
        .write(self.0.as_slice())?;

        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn append_into_container() {
        let mut doc = Document::new(
            r#"
<html>
    <body>
        <h1>Posts</h1>
        <div id="list-items"></div>
    </body>
</html>
"#,
        );

        doc.append_html(
            r#"[id="list-items"]"#,
            r#"<ul><li><a href="first-post.html">First Post</a></li></ul>"#,
        )
        .expect("not expected to fail");

        let doc = String::from_utf8_lossy(doc.as_ref());

        assert_eq!(
            doc,
            r#"
<html>
    <body>
        <h1>Posts</h1>
        <div id="list-items"><ul><li><a href="first-post.html">First Post</a></li></ul></div>
    </body>
</html>
"#
        );
    }

    #[test]
    fn append_twice_keeps_both_fragments() {
        let mut doc = Document::new(r#"<div id="list-items"></div>"#);

        doc.append_html(r#"[id="list-items"]"#, "<ul><li>one</li></ul>")
            .expect("not expected to fail");
        doc.append_html(r#"[id="list-items"]"#, "<ul><li>two</li></ul>")
            .expect("not expected to fail");

        let doc = String::from_utf8_lossy(doc.as_ref());

        assert_eq!(
            doc,
            r#"<div id="list-items"><ul><li>one</li></ul><ul><li>two</li></ul></div>"#
        );
    }

    #[test]
    fn count_selector_matches() {
        let doc = Document::new(r#"<ul id="list-items"><li>a</li><li>b</li></ul>"#);

        assert_eq!(doc.len("li").expect("not expected to fail"), 2);
        assert_eq!(
            doc.len(r#"[id="missing"]"#).expect("not expected to fail"),
            0
        );
    }
}
