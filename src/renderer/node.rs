//! Render tree produced for each design element

use serde::Serialize;

use crate::geometry::Geometry;
use crate::model::ElementKind;

use super::style::Declarations;

/// The rendered form of one element list entry.
///
/// There is exactly one node per input entry, in input order. Entries that
/// cannot be rendered (unknown type, malformed record) become `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum RenderNode {
    Empty,
    Positioned(PositionedNode),
}

impl RenderNode {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderNode::Empty)
    }

    pub fn positioned(&self) -> Option<&PositionedNode> {
        match self {
            RenderNode::Positioned(node) => Some(node),
            RenderNode::Empty => None,
        }
    }
}

/// An element placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub kind: ElementKind,
    /// Base transform applied by the wrapper
    pub geometry: Geometry,
    /// Kind-specific body, filling the wrapper
    pub content: HtmlNode,
}

/// A small HTML element tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlNode {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub style: Declarations,
    pub children: Vec<HtmlChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HtmlChild {
    Node(HtmlNode),
    /// Sanitized markup, emitted verbatim
    Markup(String),
}

impl HtmlNode {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: vec![],
            style: Declarations::new(),
            children: vec![],
        }
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn with_style(mut self, style: Declarations) -> Self {
        self.style = style;
        self
    }

    pub fn with_child(mut self, child: HtmlNode) -> Self {
        self.children.push(HtmlChild::Node(child));
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.children.push(HtmlChild::Markup(markup.into()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First descendant (or self) with the given tag
    pub fn find(&self, tag: &str) -> Option<&HtmlNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            HtmlChild::Node(node) => node.find(tag),
            HtmlChild::Markup(_) => None,
        })
    }

    /// Concatenated markup children of this node and its descendants
    pub fn markup(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                HtmlChild::Node(node) => out.push_str(&node.markup()),
                HtmlChild::Markup(markup) => out.push_str(markup),
            }
        }
        out
    }

    pub fn is_void(&self) -> bool {
        matches!(self.tag, "img" | "hr" | "br")
    }
}
