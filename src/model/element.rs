//! Design elements: the positioned units of visual content on a canvas

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::style::{null_as_default, ElementStyle};

/// Discriminant of a design element.
///
/// The five known kinds are matched exhaustively by the renderer; any other
/// string found in stored data is kept verbatim in `Unknown` so it can be
/// reported, and renders as nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Icon,
    Divider,
    Unknown(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Shape => "shape",
            ElementKind::Icon => "icon",
            ElementKind::Divider => "divider",
            ElementKind::Unknown(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ElementKind::Unknown(_))
    }
}

impl From<String> for ElementKind {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => ElementKind::Text,
            "image" => ElementKind::Image,
            "shape" => ElementKind::Shape,
            "icon" => ElementKind::Icon,
            "divider" => ElementKind::Divider,
            _ => ElementKind::Unknown(s),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(s: &str) -> Self {
        ElementKind::from(s.to_string())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Top-left corner of an element in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Extent of an element in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A single positioned visual unit on an invitation canvas.
///
/// `position` and `size` are always present; every other field is optional
/// and defaulted by the renderer (see [`crate::defaults::RenderDefaults`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignElement {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub z_index: Option<f64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: ElementStyle,
    /// Optional fields dropped at decode time because of a wrong JSON type
    #[serde(skip)]
    pub ignored_fields: Vec<String>,
}

impl DesignElement {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<ElementKind>,
        position: Position,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position,
            size,
            rotation: None,
            opacity: None,
            z_index: None,
            content: None,
            style: ElementStyle::default(),
            ignored_fields: vec![],
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(f64::from(z_index));
        self
    }

    /// Content string, empty when absent
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A stored element record that could not be decoded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MalformedElement {
    /// Position of the record in the element list
    pub index: usize,
    /// The record's `id`, when one could be recovered
    pub id: Option<String>,
    pub reason: String,
}

/// One entry of an invitation's element list.
///
/// Records are decoded one at a time so a single broken record keeps its
/// slot (and renders empty) instead of failing the whole list.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSlot {
    Element(DesignElement),
    Malformed(MalformedElement),
}

impl ElementSlot {
    /// Decode a raw JSON record at `index`.
    ///
    /// Optional fields with the wrong JSON type are dropped (and later
    /// defaulted) instead of failing the record; only a record without a
    /// usable `type`, `position` or `size` becomes malformed.
    pub fn from_value(index: usize, mut value: Value) -> Self {
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let ignored = match value.as_object_mut() {
            Some(record) => drop_mistyped_fields(record),
            None => vec![],
        };
        for field in &ignored {
            log::warn!(
                "element #{} ({:?}) has a mistyped '{}', using the default",
                index,
                id,
                field
            );
        }
        match serde_json::from_value::<DesignElement>(value) {
            Ok(mut element) => {
                element.ignored_fields = ignored;
                ElementSlot::Element(element)
            }
            Err(e) => {
                log::warn!("element #{} ({:?}) is malformed: {}", index, id, e);
                ElementSlot::Malformed(MalformedElement {
                    index,
                    id,
                    reason: e.to_string(),
                })
            }
        }
    }

    pub fn element(&self) -> Option<&DesignElement> {
        match self {
            ElementSlot::Element(e) => Some(e),
            ElementSlot::Malformed(_) => None,
        }
    }
}

/// The optional top-level fields of a record, decoded one at a time to
/// find the ones with a wrong type
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct OptionalFields {
    id: Option<String>,
    rotation: Option<f64>,
    opacity: Option<f64>,
    z_index: Option<f64>,
    content: Option<String>,
}

const OPTIONAL_FIELDS: &[&str] = &["id", "rotation", "opacity", "zIndex", "content"];

fn decodes_alone<'de, T: Deserialize<'de>>(key: &str, value: &Value) -> bool {
    let mut single = Map::new();
    single.insert(key.to_string(), value.clone());
    T::deserialize(Value::Object(single)).is_ok()
}

/// Remove optional fields whose value does not decode, returning their
/// paths (`opacity`, `style.color`, ...)
fn drop_mistyped_fields(record: &mut Map<String, Value>) -> Vec<String> {
    let mut ignored = Vec::new();
    for key in OPTIONAL_FIELDS {
        let mistyped = record
            .get(*key)
            .is_some_and(|v| !decodes_alone::<OptionalFields>(key, v));
        if mistyped {
            record.remove(*key);
            ignored.push(key.to_string());
        }
    }

    match record.get_mut("style") {
        Some(Value::Object(style)) => {
            let bad: Vec<String> = style
                .iter()
                .filter(|(k, v)| !decodes_alone::<ElementStyle>(k, v))
                .map(|(k, _)| k.clone())
                .collect();
            for key in bad {
                style.remove(&key);
                ignored.push(format!("style.{}", key));
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => {
            record.remove("style");
            ignored.push("style".to_string());
        }
    }
    ignored
}

impl From<DesignElement> for ElementSlot {
    fn from(element: DesignElement) -> Self {
        ElementSlot::Element(element)
    }
}
