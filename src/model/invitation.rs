//! Invitation metadata, canvas settings and the input document

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::CanvasDefaults;
use crate::error::DocumentError;

use super::element::ElementSlot;
use super::style::null_as_default;

/// Canvas settings stored on an invitation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvitationSettings {
    pub canvas_width: Option<f64>,
    pub canvas_height: Option<f64>,
    pub background_color: Option<String>,
}

/// Invitation metadata as returned by the data collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: InvitationSettings,
}

impl Invitation {
    /// Derive the rendering surface from this invitation's settings
    pub fn canvas(&self, defaults: &CanvasDefaults) -> Canvas {
        Canvas::from_settings(&self.settings, defaults)
    }
}

/// The fixed-size rendering surface.
///
/// Derived fresh from invitation settings on every render and never mutated
/// by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
}

impl Canvas {
    pub fn new(width: f64, height: f64, background_color: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background_color: background_color.into(),
        }
    }

    /// Build a canvas from stored settings, substituting defaults for
    /// missing or non-positive dimensions
    pub fn from_settings(settings: &InvitationSettings, defaults: &CanvasDefaults) -> Self {
        let dimension = |value: Option<f64>, fallback: f64| match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => fallback,
        };
        let background = settings
            .background_color
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&defaults.background_color);
        Self {
            width: dimension(settings.canvas_width, defaults.width),
            height: dimension(settings.canvas_height, defaults.height),
            background_color: background.to_string(),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::from_settings(&InvitationSettings::default(), &CanvasDefaults::default())
    }
}

/// RSVP and event fields used by the hosting page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RsvpInfo {
    pub enabled: bool,
    pub deadline: Option<String>,
    pub event_date: Option<String>,
    pub event_location: Option<String>,
}

impl RsvpInfo {
    /// Whether the RSVP call-to-action should be shown at `now`.
    ///
    /// An unparseable deadline does not close the RSVP window.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }
        match self.deadline.as_deref().and_then(parse_deadline) {
            Some(deadline) => now <= deadline,
            None => true,
        }
    }
}

/// Parse an ISO-8601 timestamp as stored by the data collaborator.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS[.f]]` (taken as UTC) and a
/// bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Deadlines given as a bare date stay open until the end of that day
fn parse_deadline(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        return Some(date.and_time(end_of_day).and_utc());
    }
    parse_timestamp(s)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    invitation: Invitation,
    #[serde(default, deserialize_with = "null_as_default")]
    elements: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    rsvp_enabled: bool,
    #[serde(default)]
    rsvp_deadline: Option<String>,
    #[serde(default)]
    event_date: Option<String>,
    #[serde(default)]
    event_location: Option<String>,
}

/// Everything the hosting page receives for one public invitation
#[derive(Debug, Clone, PartialEq)]
pub struct InvitationDocument {
    pub invitation: Invitation,
    pub elements: Vec<ElementSlot>,
    pub rsvp: RsvpInfo,
}

impl InvitationDocument {
    /// Decode a document from JSON.
    ///
    /// Only the envelope can fail; individual element records that do not
    /// decode become [`ElementSlot::Malformed`].
    pub fn from_json(source: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_str(source).map_err(DocumentError::from_json)?;
        let elements = raw
            .elements
            .into_iter()
            .enumerate()
            .map(|(index, value)| ElementSlot::from_value(index, value))
            .collect();
        Ok(Self {
            invitation: raw.invitation,
            elements,
            rsvp: RsvpInfo {
                enabled: raw.rsvp_enabled,
                deadline: raw.rsvp_deadline,
                event_date: raw.event_date,
                event_location: raw.event_location,
            },
        })
    }

    /// Load a document from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Canvas for this document
    pub fn canvas(&self, defaults: &CanvasDefaults) -> Canvas {
        self.invitation.canvas(defaults)
    }
}
