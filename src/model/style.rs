//! Presentational attributes attached to a design element
//!
//! Style values arrive from an external editor and are loosely typed: sizes
//! may be numbers or strings like `"16px"`, weights may be numbers or
//! keywords. The types here accept those shapes and leave validation of the
//! actual CSS text to the renderer.

use serde::{Deserialize, Deserializer, Serialize};

/// A length given either as a bare number (pixels) or as free-form text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Number(f64),
    Text(String),
}

impl Length {
    /// Pixel value, if the length is a number or a `N` / `Npx` string
    pub fn to_px(&self) -> Option<f64> {
        let value = match self {
            Length::Number(n) => *n,
            Length::Text(s) => {
                let s = s.trim();
                let s = s.strip_suffix("px").unwrap_or(s).trim_end();
                s.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Length::Number(value)
    }
}

impl From<&str> for Length {
    fn from(value: &str) -> Self {
        Length::Text(value.to_string())
    }
}

/// Font weight as a numeric weight (`700`) or a keyword (`bold`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Number(f64),
    Keyword(String),
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// Parse an alignment keyword, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }

    /// Value for the `text-align` property
    pub fn css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    /// Equivalent `justify-content` value for a flex row
    pub fn justify_content(self) -> &'static str {
        match self {
            TextAlign::Left | TextAlign::Justify => "flex-start",
            TextAlign::Center => "center",
            TextAlign::Right => "flex-end",
        }
    }
}

/// Vertical placement of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "start" | "flex-start" => Some(VerticalAlign::Top),
            "middle" | "center" => Some(VerticalAlign::Middle),
            "bottom" | "end" | "flex-end" => Some(VerticalAlign::Bottom),
            _ => None,
        }
    }

    /// Value for `align-items` on the text flex container
    pub fn align_items(self) -> &'static str {
        match self {
            VerticalAlign::Top => "flex-start",
            VerticalAlign::Middle => "center",
            VerticalAlign::Bottom => "flex-end",
        }
    }
}

/// Border/rule line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl LineStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(LineStyle::Solid),
            "dashed" => Some(LineStyle::Dashed),
            "dotted" => Some(LineStyle::Dotted),
            "double" => Some(LineStyle::Double),
            _ => None,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::Double => "double",
        }
    }
}

/// Optional bag of presentational attributes.
///
/// Every field is optional; which ones apply depends on the element kind.
/// Unknown keys in the input are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    pub font_family: Option<String>,
    pub font_size: Option<Length>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<String>,
    pub text_decoration: Option<String>,
    pub letter_spacing: Option<Length>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<Length>,
    pub border_style: Option<String>,
    pub border_radius: Option<Length>,
    pub text_align: Option<String>,
    pub vertical_align: Option<String>,
    pub line_height: Option<Length>,
    pub padding: Option<Length>,
}

impl ElementStyle {
    pub fn text_align(&self) -> Option<TextAlign> {
        self.text_align.as_deref().and_then(TextAlign::parse)
    }

    pub fn vertical_align(&self) -> Option<VerticalAlign> {
        self.vertical_align.as_deref().and_then(VerticalAlign::parse)
    }

    pub fn line_style(&self) -> Option<LineStyle> {
        self.border_style.as_deref().and_then(LineStyle::parse)
    }
}

/// Deserialize `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
