//! Sanitization of user-authored rich text
//!
//! Text and icon content is untrusted markup. Before it is placed in the
//! render tree it passes through a [`Sanitizer`], chosen once by the host:
//!
//! - [`MarkupSanitizer`] parses the input into a fragment tree and keeps a
//!   small rich-text subset (`b i em strong u br span p div` with `style` and
//!   `class` attributes).
//! - [`PlainTextSanitizer`] strips every tag and returns escaped text. It is
//!   the fallback for hosts that cannot run the markup path.
//!
//! Neither ever fails or passes input through unchanged: the worst case is
//! an empty string or plain text. Sanitizing sanitized output is a no-op.

pub mod entities;
pub mod fragment;
pub mod lexer;
pub mod policy;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use fragment::{push_text, Element, Fragment, Node};
use lexer::Token;
use policy::TagDisposition;

/// Result of one sanitization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sanitized {
    /// Markup safe to interpolate into the render tree
    pub html: String,
    /// Number of elements and attributes that were removed or unwrapped
    pub removed: usize,
}

impl Sanitized {
    /// Whether anything unsafe or disallowed was neutralized
    pub fn altered(&self) -> bool {
        self.removed > 0
    }
}

/// A sanitization strategy
pub trait Sanitizer: Send + Sync {
    /// Sanitize `raw`, reporting how much was removed
    fn clean(&self, raw: &str) -> Sanitized;

    fn mode(&self) -> SanitizerMode;

    /// Sanitize `raw` to safe markup
    fn sanitize(&self, raw: &str) -> String {
        self.clean(raw).html
    }
}

/// Which sanitizer a host runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SanitizerMode {
    /// Parse and filter markup, keeping the rich-text subset
    #[default]
    Markup,
    /// Strip all tags
    PlainText,
}

impl SanitizerMode {
    pub fn build(self) -> Box<dyn Sanitizer> {
        match self {
            SanitizerMode::Markup => Box::new(MarkupSanitizer),
            SanitizerMode::PlainText => Box::new(PlainTextSanitizer),
        }
    }
}

impl fmt::Display for SanitizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizerMode::Markup => write!(f, "markup"),
            SanitizerMode::PlainText => write!(f, "plain-text"),
        }
    }
}

impl FromStr for SanitizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markup" => Ok(SanitizerMode::Markup),
            "plain-text" | "plaintext" | "plain" => Ok(SanitizerMode::PlainText),
            other => Err(format!("unknown sanitizer mode '{}'", other)),
        }
    }
}

/// Tree-based sanitizer keeping the rich-text allow-list
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupSanitizer;

impl Sanitizer for MarkupSanitizer {
    fn clean(&self, raw: &str) -> Sanitized {
        let fragment = Fragment::parse(raw);
        let mut removed = 0;
        let mut nodes = Vec::new();
        filter_nodes(fragment.nodes, &mut nodes, &mut removed);
        let html = Fragment { nodes }.to_html();
        if removed > 0 {
            log::debug!("sanitizer removed {} element(s)/attribute(s)", removed);
        }
        Sanitized { html, removed }
    }

    fn mode(&self) -> SanitizerMode {
        SanitizerMode::Markup
    }
}

fn filter_nodes(nodes: Vec<Node>, out: &mut Vec<Node>, removed: &mut usize) {
    for node in nodes {
        match node {
            Node::Text(text) => push_text(out, &text),
            Node::Element(element) => match policy::disposition(&element.name) {
                TagDisposition::Keep => out.push(Node::Element(filter_element(element, removed))),
                TagDisposition::Unwrap => {
                    *removed += 1;
                    filter_nodes(element.children, out, removed);
                }
                TagDisposition::Remove => *removed += 1,
            },
        }
    }
}

fn filter_element(element: Element, removed: &mut usize) -> Element {
    let attribute_count = element.attributes.len();
    let attributes: Vec<(String, String)> = element
        .attributes
        .into_iter()
        .filter(|(name, value)| policy::is_allowed_attribute(name, value))
        .collect();
    *removed += attribute_count - attributes.len();

    let mut children = Vec::new();
    filter_nodes(element.children, &mut children, removed);
    Element {
        name: element.name,
        attributes,
        children,
    }
}

/// Fallback sanitizer that strips every tag and keeps only text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSanitizer;

impl Sanitizer for PlainTextSanitizer {
    fn clean(&self, raw: &str) -> Sanitized {
        let mut text = String::new();
        let mut removed = 0;
        for (token, _) in lexer::lex(raw) {
            match token {
                Token::Text(t) => text.push_str(&entities::decode(&t)),
                Token::Lt => text.push('<'),
                Token::StartTag(_) | Token::EndTag(_) => removed += 1,
                Token::Comment | Token::Declaration => {}
            }
        }
        Sanitized {
            html: entities::escape_text(&text),
            removed,
        }
    }

    fn mode(&self) -> SanitizerMode {
        SanitizerMode::PlainText
    }
}

/// Sanitize with the markup sanitizer
pub fn sanitize(raw: &str) -> String {
    MarkupSanitizer.sanitize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allow_list_keeps_bold_drops_script() {
        assert_eq!(
            sanitize("<b>hi</b><script>alert(1)</script>"),
            "<b>hi</b>"
        );
    }

    #[test]
    fn test_event_handler_stripped() {
        assert_eq!(
            sanitize(r#"<span onclick="alert(1)">x</span>"#),
            "<span>x</span>"
        );
    }

    #[test]
    fn test_unknown_tags_unwrapped() {
        assert_eq!(
            sanitize(r#"<a href="javascript:alert(1)">click <b>me</b></a>"#),
            "click <b>me</b>"
        );
        assert_eq!(sanitize(r#"<img src=x onerror="alert(1)">after"#), "after");
    }

    #[test]
    fn test_forbidden_subtrees_removed() {
        for tag in ["style", "iframe", "object", "form"] {
            let input = format!("a<{tag}>secret <b>x</b></{tag}>b");
            assert_eq!(sanitize(&input), "ab", "{tag}");
        }
        assert_eq!(sanitize(r#"a<input value="x">b"#), "ab");
        assert_eq!(sanitize(r#"a<embed src="movie.swf">b"#), "ab");
    }

    #[test]
    fn test_allowed_attributes_kept() {
        assert_eq!(
            sanitize(r#"<p class="lead" style="color: red" data-x="1" id="p">t</p>"#),
            r#"<p class="lead" style="color: red">t</p>"#
        );
    }

    #[test]
    fn test_unsafe_style_attribute_dropped() {
        assert_eq!(
            sanitize(r#"<span style="background:url(javascript:alert(1))">x</span>"#),
            "<span>x</span>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(sanitize("1 < 2 & 3 > 2"), "1 &lt; 2 &amp; 3 &gt; 2");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_clean_reports_removals() {
        let result = MarkupSanitizer.clean(r#"<b onclick="x">hi</b><script>y</script>"#);
        assert_eq!(result.html, "<b>hi</b>");
        assert_eq!(result.removed, 2);
        assert!(result.altered());
        assert!(!MarkupSanitizer.clean("<i>fine</i>").altered());
    }

    #[test]
    fn test_plain_text_fallback_strips_all_tags() {
        let out = PlainTextSanitizer.sanitize("<b>hi</b><script>bad</script>");
        assert_eq!(out, "hibad");
        assert!(!out.contains('<'));
    }

    #[test]
    fn test_plain_text_escapes() {
        assert_eq!(PlainTextSanitizer.sanitize("a &amp; b < c"), "a &amp; b &lt; c");
    }

    #[test]
    fn test_idempotent_on_samples() {
        let samples = [
            "<b>hi</b><script>alert(1)</script>",
            "<p><div>x</p></div>",
            "<<b>>",
            "a &amp;amp; b",
            "<span style='font-family:\"A&B\"'>x</span>",
            "<b",
            "</>",
            "<br/><br>text<BR >",
            "<svg><script>alert(1)</script></svg>ok",
        ];
        for mode in [SanitizerMode::Markup, SanitizerMode::PlainText] {
            let sanitizer = mode.build();
            for s in samples {
                let once = sanitizer.sanitize(s);
                assert_eq!(sanitizer.sanitize(&once), once, "{mode}: {s}");
            }
        }
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("plain-text".parse::<SanitizerMode>(), Ok(SanitizerMode::PlainText));
        assert_eq!("Markup".parse::<SanitizerMode>(), Ok(SanitizerMode::Markup));
        assert!("dom".parse::<SanitizerMode>().is_err());
        assert_eq!(SanitizerMode::PlainText.to_string(), "plain-text");
        assert_eq!(SanitizerMode::PlainText.build().mode(), SanitizerMode::PlainText);
    }
}
