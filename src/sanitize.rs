//! Markup stripping for rich-text fields.
//!
//! Rich fields are sent to the translation service as plain text: tags are
//! removed, a handful of common entities decoded, and whitespace collapsed.
//! The translated result is stored as plain text as well; the original markup
//! structure is not reconstructed.

use regex::Regex;
use std::sync::OnceLock;

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Reduce editor-produced markup to translatable plain text.
pub fn strip_markup(input: &str) -> String {
    let without_tags = tag_pattern().replace_all(input, " ");
    let decoded = decode_entities(&without_tags);
    // Collapse runs of whitespace left behind by removed tags
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(strip_markup("Merhaba"), "Merhaba");
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(strip_markup("<p>Test</p>"), "Test");
    }

    #[test]
    fn test_nested_tags() {
        assert_eq!(
            strip_markup("<div><p>Hello <strong>world</strong></p></div>"),
            "Hello world"
        );
    }

    #[test]
    fn test_tags_with_attributes() {
        assert_eq!(
            strip_markup(r#"<a href="https://example.com" target="_blank">link text</a>"#),
            "link text"
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(strip_markup("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(strip_markup("a &lt; b &gt; c"), "a < b > c");
        assert_eq!(strip_markup("it&#39;s &quot;quoted&quot;"), "it's \"quoted\"");
    }

    #[test]
    fn test_nbsp_becomes_space() {
        assert_eq!(strip_markup("one&nbsp;two"), "one two");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(strip_markup("<p>one</p>\n\n<p>two</p>"), "one two");
    }

    #[test]
    fn test_empty_markup_strips_to_empty() {
        assert_eq!(strip_markup("<p></p>"), "");
        assert_eq!(strip_markup("<p>&nbsp;</p>"), "");
        assert_eq!(strip_markup(""), "");
    }
}
