//! Lint engine for detecting defects in an element list.
//!
//! Rendering never rejects an element; it clamps and defaults instead. The
//! lint pass reports what was clamped, dropped or neutralized so an editor
//! can surface it. It never changes render output.

use std::collections::HashSet;
use std::fmt;

use crate::geometry::{BoundingBox, Geometry};
use crate::model::{Canvas, DesignElement, ElementKind, ElementSlot};
use crate::renderer::style::safe_image_url;
use crate::sanitizer::Sanitizer;

/// A lint warning about an element
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Bounds,
    Geometry,
    Value,
    Identity,
    Type,
    Content,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Bounds => write!(f, "bounds"),
            LintCategory::Geometry => write!(f, "geometry"),
            LintCategory::Value => write!(f, "value"),
            LintCategory::Identity => write!(f, "identity"),
            LintCategory::Type => write!(f, "type"),
            LintCategory::Content => write!(f, "content"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks on an element list.
pub fn check(slots: &[ElementSlot], canvas: &Canvas, sanitizer: &dyn Sanitizer) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_identity(slots, &mut warnings);

    let canvas_box = BoundingBox::new(0.0, 0.0, canvas.width, canvas.height);
    for (index, slot) in slots.iter().enumerate() {
        match slot {
            ElementSlot::Malformed(malformed) => warnings.push(LintWarning {
                category: LintCategory::Type,
                message: format!(
                    "record #{} is malformed and renders nothing: {}",
                    malformed.index + 1,
                    malformed.reason
                ),
            }),
            ElementSlot::Element(element) => {
                let name = element_display_name(element, index);
                check_kind(element, &name, &mut warnings);
                check_values(element, &name, &mut warnings);
                check_geometry(element, &name, &canvas_box, &mut warnings);
                check_content(element, &name, sanitizer, &mut warnings);
            }
        }
    }
    warnings
}

/// Display name for an element: its ID if set, or its list position
fn element_display_name(element: &DesignElement, index: usize) -> String {
    if element.id.is_empty() {
        format!("<element #{}>", index + 1)
    } else {
        format!("\"{}\"", element.id)
    }
}

fn warn(warnings: &mut Vec<LintWarning>, category: LintCategory, message: String) {
    warnings.push(LintWarning { category, message });
}

// ── Identity ──────────────────────────────────────────────────────

fn check_identity(slots: &[ElementSlot], warnings: &mut Vec<LintWarning>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for (index, element) in slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.element().map(|e| (i, e)))
    {
        if element.id.trim().is_empty() {
            warn(
                warnings,
                LintCategory::Identity,
                format!("element #{} has no id", index + 1),
            );
        } else if !seen.insert(&element.id) && reported.insert(&element.id) {
            warn(
                warnings,
                LintCategory::Identity,
                format!("id \"{}\" is used by more than one element", element.id),
            );
        }
    }
}

// ── Kind ──────────────────────────────────────────────────────────

fn check_kind(element: &DesignElement, name: &str, warnings: &mut Vec<LintWarning>) {
    if let ElementKind::Unknown(kind) = &element.kind {
        warn(
            warnings,
            LintCategory::Type,
            format!("{} has unknown type \"{}\" and renders nothing", name, kind),
        );
    }
}

// ── Values ────────────────────────────────────────────────────────

fn check_values(element: &DesignElement, name: &str, warnings: &mut Vec<LintWarning>) {
    for field in &element.ignored_fields {
        warn(
            warnings,
            LintCategory::Value,
            format!("{} has a {} of the wrong type; default used", name, field),
        );
    }

    let numbers = [
        ("position.x", Some(element.position.x)),
        ("position.y", Some(element.position.y)),
        ("size.width", Some(element.size.width)),
        ("size.height", Some(element.size.height)),
        ("rotation", element.rotation),
        ("opacity", element.opacity),
        ("zIndex", element.z_index),
    ];
    for (field, value) in numbers {
        if let Some(v) = value {
            if !v.is_finite() {
                warn(
                    warnings,
                    LintCategory::Value,
                    format!("{} has a non-finite {}; treated as default", name, field),
                );
            }
        }
    }

    if let Some(opacity) = element.opacity.filter(|o| o.is_finite()) {
        if !(0.0..=1.0).contains(&opacity) {
            warn(
                warnings,
                LintCategory::Value,
                format!(
                    "{} has opacity {} outside [0, 1]; clamped to {}",
                    name,
                    opacity,
                    opacity.clamp(0.0, 1.0)
                ),
            );
        }
    }

    if let Some(z) = element.z_index.filter(|z| z.is_finite()) {
        if z.fract() != 0.0 || z < f64::from(i32::MIN) || z > f64::from(i32::MAX) {
            warn(
                warnings,
                LintCategory::Value,
                format!(
                    "{} has zIndex {}; used as {}",
                    name,
                    z,
                    Geometry::of(element).z_index
                ),
            );
        }
    }
}

// ── Geometry and bounds ───────────────────────────────────────────

fn check_geometry(
    element: &DesignElement,
    name: &str,
    canvas: &BoundingBox,
    warnings: &mut Vec<LintWarning>,
) {
    if !element.kind.is_known() {
        return;
    }
    let size = element.size;
    if size.width < 0.0 || size.height < 0.0 {
        warn(
            warnings,
            LintCategory::Geometry,
            format!(
                "{} has negative size {}x{}; clamped to zero",
                name, size.width, size.height
            ),
        );
        return;
    }

    let geometry = Geometry::of(element);
    if !geometry.has_area() {
        warn(
            warnings,
            LintCategory::Geometry,
            format!("{} has zero area and is invisible", name),
        );
        return;
    }

    let visual = geometry.visual_bounds();
    if !canvas.contains_box(&visual) {
        let rotated = if geometry.is_rotated() { " (rotated)" } else { "" };
        warn(
            warnings,
            LintCategory::Bounds,
            format!(
                "{}{} extends outside the {}x{} canvas: x={:.1} y={:.1} w={:.1} h={:.1}",
                name,
                rotated,
                canvas.width,
                canvas.height,
                visual.x,
                visual.y,
                visual.width,
                visual.height
            ),
        );
    }
}

// ── Content ───────────────────────────────────────────────────────

fn check_content(
    element: &DesignElement,
    name: &str,
    sanitizer: &dyn Sanitizer,
    warnings: &mut Vec<LintWarning>,
) {
    match &element.kind {
        ElementKind::Text | ElementKind::Icon => {
            let cleaned = sanitizer.clean(element.content());
            if cleaned.altered() {
                warn(
                    warnings,
                    LintCategory::Content,
                    format!(
                        "{} content had {} disallowed tag(s)/attribute(s) removed",
                        name, cleaned.removed
                    ),
                );
            }
        }
        ElementKind::Image => {
            let url = element.content().trim();
            if url.is_empty() {
                warn(
                    warnings,
                    LintCategory::Content,
                    format!("{} has no image URL and renders an empty box", name),
                );
            } else if safe_image_url(url).is_none() {
                warn(
                    warnings,
                    LintCategory::Content,
                    format!("{} image URL was rejected and renders an empty box", name),
                );
            }
        }
        ElementKind::Shape | ElementKind::Divider | ElementKind::Unknown(_) => {}
    }
}
