//! Element renderer: design elements to positioned render nodes
//!
//! [`render`] maps an element list onto a canvas, one [`RenderNode`] per
//! element in input order. `zIndex` is carried in each node's geometry as a
//! paint-order hint; the list itself is never reordered. The [`html`]
//! module serializes nodes and the canvas container.

pub mod config;
pub mod elements;
pub mod html;
pub mod node;
pub mod style;

pub use config::HtmlConfig;
pub use elements::{render_element, RenderContext, ShapeKind};
pub use html::{render_canvas_html, render_node_html, HtmlBuilder};
pub use node::{HtmlChild, HtmlNode, PositionedNode, RenderNode};

use crate::defaults::RenderDefaults;
use crate::model::{Canvas, DesignElement, ElementSlot};
use crate::sanitizer::Sanitizer;

/// Render elements onto a canvas with the built-in defaults
pub fn render(elements: &[DesignElement], canvas: &Canvas, sanitizer: &dyn Sanitizer) -> Vec<RenderNode> {
    render_with_defaults(elements, canvas, &RenderDefaults::default(), sanitizer)
}

/// Render elements onto a canvas with a custom defaults table
pub fn render_with_defaults(
    elements: &[DesignElement],
    canvas: &Canvas,
    defaults: &RenderDefaults,
    sanitizer: &dyn Sanitizer,
) -> Vec<RenderNode> {
    log::debug!(
        "rendering {} element(s) on a {}x{} canvas ({} sanitizer)",
        elements.len(),
        canvas.width,
        canvas.height,
        sanitizer.mode()
    );
    let ctx = RenderContext::new(defaults, sanitizer);
    elements.iter().map(|e| render_element(e, &ctx)).collect()
}

/// Render decoded element slots; malformed records keep their place as
/// empty nodes
pub fn render_slots(
    slots: &[ElementSlot],
    canvas: &Canvas,
    defaults: &RenderDefaults,
    sanitizer: &dyn Sanitizer,
) -> Vec<RenderNode> {
    log::debug!(
        "rendering {} slot(s) on a {}x{} canvas ({} sanitizer)",
        slots.len(),
        canvas.width,
        canvas.height,
        sanitizer.mode()
    );
    let ctx = RenderContext::new(defaults, sanitizer);
    slots
        .iter()
        .map(|slot| match slot {
            ElementSlot::Element(element) => render_element(element, &ctx),
            ElementSlot::Malformed(_) => RenderNode::Empty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MalformedElement, Position, Size};
    use crate::sanitizer::MarkupSanitizer;

    fn element(id: &str, kind: &str) -> DesignElement {
        DesignElement::new(id, kind, Position::new(0.0, 0.0), Size::new(10.0, 10.0))
    }

    #[test]
    fn test_empty_list() {
        assert!(render(&[], &Canvas::default(), &MarkupSanitizer).is_empty());
    }

    #[test]
    fn test_one_node_per_element_in_order() {
        let elements = vec![
            element("a", "text").with_z_index(5),
            element("b", "bogus"),
            element("c", "shape").with_z_index(-1),
        ];
        let nodes = render(&elements, &Canvas::default(), &MarkupSanitizer);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].positioned().map(|n| n.id.as_str()), Some("a"));
        assert!(nodes[1].is_empty());
        assert_eq!(nodes[2].positioned().map(|n| n.id.as_str()), Some("c"));
    }

    #[test]
    fn test_malformed_slots_render_empty() {
        let slots = vec![
            ElementSlot::from(element("a", "divider")),
            ElementSlot::Malformed(MalformedElement {
                index: 1,
                id: None,
                reason: "missing field `size`".to_string(),
            }),
        ];
        let nodes = render_slots(
            &slots,
            &Canvas::default(),
            &RenderDefaults::default(),
            &MarkupSanitizer,
        );
        assert_eq!(nodes.len(), 2);
        assert!(!nodes[0].is_empty());
        assert!(nodes[1].is_empty());
    }
}
