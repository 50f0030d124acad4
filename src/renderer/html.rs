//! HTML serialization of render nodes and the canvas container

use crate::defaults::RenderDefaults;
use crate::model::Canvas;
use crate::sanitizer::entities::{escape_attribute, escape_text};

use super::config::HtmlConfig;
use super::node::{HtmlChild, HtmlNode, RenderNode};
use super::style::{css_or, frame_declarations, Declarations};

/// Builder for HTML output, one line per tag when pretty-printing
pub struct HtmlBuilder {
    config: HtmlConfig,
    lines: Vec<String>,
    indent: usize,
}

impl HtmlBuilder {
    /// Create a new HTML builder
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            lines: vec![],
            indent: 0,
        }
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add a line of already-safe markup at the current indentation
    pub fn raw_line(&mut self, markup: &str) {
        self.lines.push(format!("{}{}", self.indent_str(), markup));
    }

    /// Open a tag; its content follows on the next lines
    pub fn open(&mut self, tag: &str, attributes: &[(&str, String)], style: Option<&Declarations>) {
        self.raw_line(&format!("<{}{}>", tag, format_attributes(attributes, style)));
        self.indent += 1;
    }

    /// Close the innermost tag opened with [`HtmlBuilder::open`]
    pub fn close(&mut self, tag: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.raw_line(&format!("</{}>", tag));
    }

    /// Add an element with inline markup content on a single line
    pub fn inline(
        &mut self,
        tag: &str,
        attributes: &[(&str, String)],
        style: Option<&Declarations>,
        inner_html: &str,
    ) {
        self.raw_line(&format!(
            "<{}{}>{}</{}>",
            tag,
            format_attributes(attributes, style),
            inner_html,
            tag
        ));
    }

    /// Add an element whose content is escaped text
    pub fn text(&mut self, tag: &str, attributes: &[(&str, String)], text: &str) {
        self.inline(tag, attributes, None, &escape_text(text));
    }

    /// Add an HTML node tree
    pub fn add_node(&mut self, node: &HtmlNode) {
        let style = (!node.style.is_empty()).then_some(&node.style);
        if node.is_void() {
            self.raw_line(&format!(
                "<{}{}>",
                node.tag,
                format_attributes(&node.attributes, style)
            ));
            return;
        }

        let inline_only = node
            .children
            .iter()
            .all(|c| matches!(c, HtmlChild::Markup(_)));
        if inline_only {
            self.inline(node.tag, &node.attributes, style, &node.markup());
            return;
        }

        self.open(node.tag, &node.attributes, style);
        for child in &node.children {
            match child {
                HtmlChild::Node(child) => self.add_node(child),
                HtmlChild::Markup(markup) => self.raw_line(markup),
            }
        }
        self.close(node.tag);
    }

    /// Add a rendered element inside its positioned wrapper.
    ///
    /// Empty nodes produce no output.
    pub fn add_render_node(&mut self, node: &RenderNode) {
        let RenderNode::Positioned(node) = node else {
            return;
        };
        let prefix = self.config.prefix().to_string();
        let attributes = [
            (
                "class",
                format!("{p}element {p}{}", node.kind.as_str(), p = prefix),
            ),
            ("data-element-id", node.id.clone()),
        ];
        let frame = frame_declarations(&node.geometry);
        self.open("div", &attributes, Some(&frame));
        self.add_node(&node.content);
        self.close("div");
    }

    /// Build the final HTML string
    pub fn build(self) -> String {
        self.lines.join(self.newline())
    }
}

/// Format attributes (and an optional style) as ` name="value"` pairs
fn format_attributes(attributes: &[(&str, String)], style: Option<&Declarations>) -> String {
    let mut out = String::new();
    for (name, value) in attributes {
        out.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
    }
    if let Some(style) = style {
        out.push_str(&format!(r#" style="{}""#, escape_attribute(&style.to_css())));
    }
    out
}

/// Declarations of the canvas container
pub fn canvas_declarations(canvas: &Canvas, defaults: &RenderDefaults) -> Declarations {
    let mut decls = Declarations::new();
    decls
        .push("position", "relative")
        .push_px("width", canvas.width)
        .push_px("height", canvas.height)
        .push(
            "background-color",
            css_or(
                Some(canvas.background_color.as_str()),
                &defaults.canvas.background_color,
            ),
        )
        .push("overflow", "hidden");
    decls
}

/// Write the canvas container with every node inside it
pub fn write_canvas(
    builder: &mut HtmlBuilder,
    nodes: &[RenderNode],
    canvas: &Canvas,
    defaults: &RenderDefaults,
) {
    let class = format!("{}canvas", builder.config().prefix());
    let decls = canvas_declarations(canvas, defaults);
    builder.open("div", &[("class", class)], Some(&decls));
    for node in nodes {
        builder.add_render_node(node);
    }
    builder.close("div");
}

/// Render nodes into a canvas container fragment
pub fn render_canvas_html(
    nodes: &[RenderNode],
    canvas: &Canvas,
    defaults: &RenderDefaults,
    config: &HtmlConfig,
) -> String {
    let mut builder = HtmlBuilder::new(config.clone());
    write_canvas(&mut builder, nodes, canvas, defaults);
    builder.build()
}

/// Render a single node with its wrapper
pub fn render_node_html(node: &RenderNode, config: &HtmlConfig) -> String {
    let mut builder = HtmlBuilder::new(config.clone());
    builder.add_render_node(node);
    builder.build()
}
