//! Allow-lists for user-authored rich text

/// Tags kept in sanitized output
pub const ALLOWED_TAGS: &[&str] = &["b", "i", "em", "strong", "u", "br", "span", "p", "div"];

/// Attributes kept on allowed tags
pub const ALLOWED_ATTRIBUTES: &[&str] = &["style", "class"];

/// Elements removed together with everything inside them
pub const FORBIDDEN_SUBTREES: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "form", "input", "textarea", "select",
    "option", "button", "template", "noscript", "noembed", "noframes", "frame", "frameset",
    "applet", "title", "xmp", "plaintext", "svg", "math", "link", "meta", "base",
];

/// Elements whose content is raw text up to the matching end tag
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes", "noscript",
    "plaintext",
];

/// Elements that never have children or an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Substrings that disqualify an inline `style` attribute (checked on the
/// lowercased value with whitespace removed)
const UNSAFE_STYLE_TOKENS: &[&str] = &[
    "url(",
    "image(",
    "image-set(",
    "cross-fade(",
    "element(",
    "expression(",
    "javascript:",
    "vbscript:",
    "@import",
    "behavior:",
    "-moz-binding",
    "\\",
    "/*",
];

/// What to do with an element found in untrusted markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDisposition {
    /// Keep the element (with filtered attributes)
    Keep,
    /// Drop the tag but keep its children
    Unwrap,
    /// Drop the element and everything inside it
    Remove,
}

pub fn disposition(tag: &str) -> TagDisposition {
    if FORBIDDEN_SUBTREES.contains(&tag) {
        TagDisposition::Remove
    } else if ALLOWED_TAGS.contains(&tag) {
        TagDisposition::Keep
    } else {
        TagDisposition::Unwrap
    }
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Whether an attribute survives on an allowed tag.
///
/// Only `style` and `class` are permitted; event handlers and `data-*`
/// never are. A `style` value that can load resources or run script is
/// dropped entirely.
pub fn is_allowed_attribute(name: &str, value: &str) -> bool {
    if !ALLOWED_ATTRIBUTES.contains(&name) {
        return false;
    }
    name != "style" || is_safe_inline_style(value)
}

fn is_safe_inline_style(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    !UNSAFE_STYLE_TOKENS.iter().any(|token| compact.contains(token))
}
