//! The defaults table consulted by the renderer.
//!
//! Every value the renderer substitutes for a missing style attribute lives
//! here, so the per-kind defaults can be audited (and overridden from TOML)
//! in one place.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{LineStyle, TextAlign, VerticalAlign};
use crate::renderer::style::safe_css_value;

/// Errors that can occur when loading or validating a defaults table
#[derive(Error, Debug)]
pub enum DefaultsError {
    #[error("Failed to read defaults file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse defaults TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid default for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl DefaultsError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasDefaults {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
}

impl Default for CanvasDefaults {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub color: String,
    pub line_height: f64,
    pub padding: f64,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font_family: "inherit".to_string(),
            font_size: 16.0,
            font_weight: "normal".to_string(),
            color: "#000000".to_string(),
            line_height: 1.5,
            padding: 4.0,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub border_style: LineStyle,
    /// Corner radius used by the `rounded` shape kind
    pub rounded_radius: f64,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            background_color: "#e0e0e0".to_string(),
            border_color: "#000000".to_string(),
            border_width: 1.0,
            border_style: LineStyle::Solid,
            rounded_radius: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IconDefaults {
    /// Glyph size as a fraction of the smaller box dimension
    pub scale: f64,
    pub color: String,
}

impl Default for IconDefaults {
    fn default() -> Self {
        Self {
            scale: 0.8,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DividerDefaults {
    pub thickness: f64,
    pub color: String,
    pub style: LineStyle,
}

impl Default for DividerDefaults {
    fn default() -> Self {
        Self {
            thickness: 2.0,
            color: "#000000".to_string(),
            style: LineStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageDefaults {
    /// `object-fit` of the picture inside its box
    pub fit: String,
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            fit: "cover".to_string(),
        }
    }
}

/// Per-kind render defaults
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    pub canvas: CanvasDefaults,
    pub text: TextDefaults,
    pub shape: ShapeDefaults,
    pub icon: IconDefaults,
    pub divider: DividerDefaults,
    pub image: ImageDefaults,
}

impl RenderDefaults {
    /// Load a defaults table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DefaultsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a defaults table from a TOML string.
    ///
    /// Tables and keys that are absent keep their built-in values.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, DefaultsError> {
        let parsed: RenderDefaults = toml::from_str(content)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check that every value is usable as-is in CSS output
    pub fn validate(&self) -> Result<(), DefaultsError> {
        let colors = [
            ("canvas.background_color", &self.canvas.background_color),
            ("text.font_family", &self.text.font_family),
            ("text.font_weight", &self.text.font_weight),
            ("text.color", &self.text.color),
            ("shape.background_color", &self.shape.background_color),
            ("shape.border_color", &self.shape.border_color),
            ("icon.color", &self.icon.color),
            ("divider.color", &self.divider.color),
            ("image.fit", &self.image.fit),
        ];
        for (field, value) in colors {
            if safe_css_value(value).is_none() {
                return Err(DefaultsError::invalid(
                    field,
                    format!("'{}' is not a safe CSS value", value),
                ));
            }
        }

        let positive = [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("text.font_size", self.text.font_size),
            ("text.line_height", self.text.line_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DefaultsError::invalid(field, "must be a positive number"));
            }
        }

        let non_negative = [
            ("text.padding", self.text.padding),
            ("shape.border_width", self.shape.border_width),
            ("shape.rounded_radius", self.shape.rounded_radius),
            ("divider.thickness", self.divider.thickness),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DefaultsError::invalid(field, "must be zero or positive"));
            }
        }

        if !(self.icon.scale.is_finite() && self.icon.scale > 0.0 && self.icon.scale <= 1.0) {
            return Err(DefaultsError::invalid("icon.scale", "must be in (0, 1]"));
        }
        Ok(())
    }
}
