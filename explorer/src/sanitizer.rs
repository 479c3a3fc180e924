//! Allowlist HTML cleaning for backend-generated rich text.
//!
//! Summaries and gap reports arrive as HTML rendered from model output, so
//! they are untrusted. The markup is parsed into a real DOM and rebuilt from
//! allowlisted elements and attributes: executable elements go together with
//! their contents, other unknown tags are unwrapped, stray `<` and `>` in
//! text come back escaped, and `href` schemes are checked after entity
//! decoding.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};
use regex::Regex;

const EXECUTABLE_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "applet", "frame",
    "frameset", "svg", "math",
];

const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "div", "span", "ul", "ol", "li", "dl",
    "dt", "dd", "strong", "b", "em", "i", "u", "s", "del", "ins", "mark", "small", "sub", "sup",
    "code", "pre", "blockquote", "a", "table", "thead", "tbody", "tfoot", "tr", "th", "td",
    "caption",
];

const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("td", &["colspan", "rowspan"]),
    ("th", &["colspan", "rowspan", "scope"]),
    ("ol", &["start"]),
];

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

pub struct HtmlSanitizer {
    cleaner: Builder<'static>,
    tag: Regex,
    block_end: Regex,
    blank_lines: Regex,
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = ALLOWED_ATTRIBUTES
            .iter()
            .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect()))
            .collect();

        let mut cleaner = Builder::empty();
        cleaner
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .clean_content_tags(EXECUTABLE_TAGS.iter().copied().collect())
            .tag_attributes(tag_attributes)
            .url_schemes(LINK_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .link_rel(Some("noopener noreferrer"))
            .strip_comments(true);

        Self {
            cleaner,
            tag: Regex::new(r"<[^>]*>").expect("tag pattern is valid"),
            block_end: Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|pre|blockquote)>")
                .expect("block pattern is valid"),
            blank_lines: Regex::new(r"\n{3,}").expect("blank line pattern is valid"),
        }
    }

    pub fn sanitize(&self, raw: &str) -> String {
        self.cleaner.clean(raw).to_string()
    }

    /// Sanitizes and flattens to terminal-friendly text.
    pub fn plain_text(&self, raw: &str) -> String {
        let clean = self.sanitize(raw);
        let with_breaks = self.block_end.replace_all(&clean, "\n");
        let text = self.tag.replace_all(&with_breaks, "");
        let text = decode_entities(&text);
        self.blank_lines
            .replace_all(text.trim(), "\n\n")
            .into_owned()
    }
}

// Sanitized output only carries the serializer's own escapes.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_keeps_sibling_paragraph() {
        let sanitizer = HtmlSanitizer::new();
        let out = sanitizer.sanitize("<script>alert(1)</script><p>Safe</p>");
        assert_eq!(out, "<p>Safe</p>");

        let out = sanitizer.sanitize("<p>Safe</p><SCRIPT type=\"text/javascript\">\nalert(1)\n</script >");
        assert_eq!(out, "<p>Safe</p>");
    }

    #[test]
    fn drops_event_handlers_and_unknown_attributes() {
        let sanitizer = HtmlSanitizer::new();
        let out = sanitizer.sanitize(r#"<p onclick="steal()" class="x">Hi</p><img src=x onerror=alert(1)>"#);
        assert_eq!(out, "<p>Hi</p>");
    }

    #[test]
    fn removed_tags_cannot_splice_a_new_tag() {
        let sanitizer = HtmlSanitizer::new();
        let out = sanitizer.sanitize("<p>Safe</p><<x>img src=x onerror=alert(1)>");

        assert!(out.starts_with("<p>Safe</p>"));
        assert!(!out.contains("<img"), "got {}", out);
        assert!(out.contains("&lt;img"), "got {}", out);
    }

    #[test]
    fn neutralizes_script_links_but_keeps_safe_ones() {
        let sanitizer = HtmlSanitizer::new();
        let out = sanitizer.sanitize(
            r#"<a href=" JaVaScript:alert(1)">bad</a> <a href="https://docs.example/x" target="_blank">good</a>"#,
        );

        assert!(!out.to_ascii_lowercase().contains("javascript"), "got {}", out);
        assert!(!out.contains("target"));
        assert!(out.contains(r#"<a href="https://docs.example/x" rel="noopener noreferrer">good</a>"#));
    }

    #[test]
    fn entity_encoded_schemes_are_blocked() {
        let sanitizer = HtmlSanitizer::new();
        for html in [
            r#"<a href="java&#115;cript:alert(1)">x</a>"#,
            r#"<a href="&#x6A;avascript:alert(1)">x</a>"#,
            r#"<a href="javascript&colon;alert(1)">x</a>"#,
            r#"<a href="data:text/html,<script>alert(1)</script>">x</a>"#,
        ] {
            let out = sanitizer.sanitize(html);
            assert!(!out.contains("href"), "{} became {}", html, out);
            assert!(out.ends_with(">x</a>"));
        }
    }

    #[test]
    fn ampersands_in_links_are_escaped() {
        let sanitizer = HtmlSanitizer::new();
        let out = sanitizer.sanitize(r#"<a href="https://docs.example/?a=1&b=2">q</a>"#);
        assert!(out.contains(r#"href="https://docs.example/?a=1&amp;b=2""#), "got {}", out);
    }

    #[test]
    fn preserves_structure() {
        let sanitizer = HtmlSanitizer::new();
        let html = "<h3>Gaps</h3><ul><li><strong>Kafka</strong></li></ul><table><tbody><tr><td colspan=\"2\">x</td></tr></tbody></table>";
        assert_eq!(sanitizer.sanitize(html), html);
    }

    #[test]
    fn unwraps_disallowed_tags_and_removes_comments() {
        let sanitizer = HtmlSanitizer::new();
        let out = sanitizer.sanitize("<form action=\"/x\"><p>Text<!-- hidden --></p></form>");
        assert_eq!(out, "<p>Text</p>");
    }

    #[test]
    fn plain_text_flattens_blocks() {
        let sanitizer = HtmlSanitizer::new();
        let text = sanitizer.plain_text("<h3>Kafka</h3>\n<p>No runbooks &amp; no owners</p><script>x()</script>");
        assert_eq!(text, "Kafka\n\nNo runbooks & no owners");
    }
}
