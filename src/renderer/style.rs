//! CSS declaration building and value validation
//!
//! Every style value that reaches the output goes through this module.
//! Values from element styles are untrusted: a value is either accepted
//! verbatim (after [`safe_css_value`]) or replaced by its default, never
//! escaped into something half-valid.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::geometry::Geometry;
use crate::model::{FontWeight, Length};

/// An ordered list of CSS declarations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declarations(Vec<(&'static str, String)>);

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.push((property, value.into()));
        self
    }

    /// Push a pixel length
    pub fn push_px(&mut self, property: &'static str, value: f64) -> &mut Self {
        self.push(property, px(value))
    }

    /// Push `value` if present, otherwise nothing
    pub fn push_opt(&mut self, property: &'static str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.push(property, value);
        }
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Render as the value of a `style` attribute: `a:b;c:d`
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{}:{}", p, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Serialize for Declarations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (property, value) in &self.0 {
            map.serialize_entry(property, value)?;
        }
        map.end()
    }
}

/// Substrings that disqualify a style value, checked case-insensitively
const UNSAFE_VALUE_TOKENS: &[&str] = &["url(", "expression(", "javascript:", "image-set(", "/*"];

/// Characters that could end a declaration or break out of the attribute
const UNSAFE_VALUE_CHARS: &[char] = &[';', '{', '}', '<', '>', '"', '\\'];

/// Accept a style value for direct use in a declaration.
///
/// Returns the trimmed value, or `None` when it is empty or could escape its
/// declaration or load a resource.
pub fn safe_css_value(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty()
        || value.contains(UNSAFE_VALUE_CHARS)
        || value.chars().any(char::is_control)
    {
        return None;
    }
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if UNSAFE_VALUE_TOKENS.iter().any(|t| compact.contains(t)) {
        return None;
    }
    Some(value)
}

/// A style value if safe, else the fallback
pub fn css_or(value: Option<&str>, fallback: &str) -> String {
    value
        .and_then(safe_css_value)
        .unwrap_or(fallback)
        .to_string()
}

/// Format a number in shortest form, rounded to three decimals
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    // scaling by 1000 overflows near f64::MAX, and such values have no
    // fractional digits left to round anyway
    let rounded = if value.abs() > 1e15 {
        value
    } else {
        (value * 1000.0).round() / 1000.0
    };
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

pub fn px(value: f64) -> String {
    format!("{}px", num(value))
}

/// CSS for a length: numbers and `Npx` strings become pixels, other safe
/// text (`1.2em`, `50%`) passes through
pub fn length_css(length: &Length) -> Option<String> {
    match length.to_px() {
        Some(value) => Some(px(value)),
        None => match length {
            Length::Text(text) => safe_css_value(text).map(str::to_string),
            Length::Number(_) => None,
        },
    }
}

/// Non-negative pixel value of a length
pub fn length_px(length: Option<&Length>) -> Option<f64> {
    length.and_then(Length::to_px).map(|v| v.max(0.0))
}

/// `line-height` is unitless when given as a number
pub fn line_height_css(length: &Length) -> Option<String> {
    match length {
        Length::Number(n) if n.is_finite() && *n >= 0.0 => Some(num(*n)),
        Length::Number(_) => None,
        Length::Text(text) => safe_css_value(text).map(str::to_string),
    }
}

pub fn font_weight_css(weight: &FontWeight) -> Option<String> {
    match weight {
        FontWeight::Number(n) if (1.0..=1000.0).contains(n) => Some(num(*n)),
        FontWeight::Number(_) => None,
        FontWeight::Keyword(k) => safe_css_value(k).map(str::to_string),
    }
}

/// Accept an image URL for an `src` attribute.
///
/// Allowed: `http:`, `https:`, protocol-relative and relative URLs, and
/// raster `data:image/` URLs. Anything with another scheme, embedded
/// whitespace or control characters is rejected.
pub fn safe_image_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() || url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") || lower.starts_with("//") {
        return Some(url);
    }
    if let Some(data) = lower.strip_prefix("data:image/") {
        return (!data.starts_with("svg")).then_some(url);
    }
    // relative: no scheme before the first path, query or fragment delimiter
    let head_end = lower.find(['/', '?', '#']).unwrap_or(lower.len());
    (!lower[..head_end].contains(':')).then_some(url)
}

/// Declarations for the absolutely positioned wrapper of an element
pub fn frame_declarations(geometry: &Geometry) -> Declarations {
    let mut decls = Declarations::new();
    decls
        .push("position", "absolute")
        .push_px("left", geometry.left)
        .push_px("top", geometry.top)
        .push_px("width", geometry.width)
        .push_px("height", geometry.height)
        .push("z-index", geometry.z_index.to_string())
        .push("opacity", num(geometry.opacity));
    if geometry.is_rotated() {
        decls
            .push("transform", format!("rotate({}deg)", num(geometry.rotation)))
            .push("transform-origin", "center center");
    }
    decls
}
