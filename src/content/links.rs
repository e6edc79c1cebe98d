//! Post-processing of rendered HTML: sibling links and titles.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::utils::html;

/// `<a href="Target.md">`, optionally with a `#fragment`.
static DOC_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="([^"]*?)\.(?i:md|markdown)(#[^"]*)?""#).unwrap()
});

/// Point links at sibling documents to their served path (`Foo.md` → `Foo`).
///
/// Links with a scheme, an absolute path or a directory part are left alone.
pub fn rewrite_doc_links(html: &str) -> String {
    DOC_LINK
        .replace_all(html, |caps: &Captures<'_>| {
            let target = &caps[1];
            let sibling = target.strip_prefix("./").unwrap_or(target);
            if sibling.is_empty() || sibling.contains(['/', ':', '\\']) {
                return caps[0].to_owned();
            }
            let fragment = caps.get(2).map_or("", |m| m.as_str());
            format!(r#"<a href="{sibling}{fragment}""#)
        })
        .into_owned()
}

/// Plain text of the first `<h1>`, if it has any.
pub fn first_heading(html: &str) -> Option<String> {
    let dom = tl::parse(html, tl::ParserOptions::default()).ok()?;
    let parser = dom.parser();
    let heading = dom.query_selector("h1")?.next()?.get(parser)?;
    let text = html::unescape(&heading.inner_text(parser)).trim().to_owned();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::render_markdown;

    #[test]
    fn test_rewrite_sibling_links() {
        let out = rewrite_doc_links(r#"<a href="Foo.md">Foo</a> and <a href="./bar.MD#top">bar</a>"#);
        assert_eq!(out, r#"<a href="Foo">Foo</a> and <a href="bar#top">bar</a>"#);
    }

    #[test]
    fn test_keeps_external_and_nested_links() {
        let input = concat!(
            r#"<a href="https://example.com/x.md">a</a>"#,
            r#"<a href="/abs/y.md">b</a>"#,
            r#"<a href="dir/z.md">c</a>"#,
            r#"<a href="img.png">d</a>"#,
        );
        assert_eq!(rewrite_doc_links(input), input);
    }

    #[test]
    fn test_first_heading() {
        let html = "<p>intro</p>\n<h1 id=\"x\">Hello <em>big</em> &amp; bold</h1>\n<h1>Second</h1>";
        assert_eq!(first_heading(html).as_deref(), Some("Hello big & bold"));
    }

    #[test]
    fn test_heading_spanning_lines() {
        assert_eq!(first_heading("<h1>one\ntwo</h1>").as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn test_heading_with_quoted_angle_bracket() {
        let html = render_markdown(r#"# <span title="a>b">Real</span>"#);
        assert_eq!(first_heading(&html).as_deref(), Some("Real"));
    }

    #[test]
    fn test_no_heading() {
        assert_eq!(first_heading("<h2>Sub</h2>"), None);
        assert_eq!(first_heading("<h1>  </h1>"), None);
    }
}
