//! Invite Render - public invitation renderer
//!
//! This library renders an invitation's design elements onto an absolutely
//! positioned canvas and sanitizes the user-authored rich text they carry.
//!
//! # Example
//!
//! ```rust
//! use invite_render::render_document_html;
//!
//! let html = render_document_html(r#"{
//!     "invitation": {"title": "Garden Party"},
//!     "elements": [{
//!         "id": "greeting", "type": "text",
//!         "position": {"x": 40, "y": 40}, "size": {"width": 300, "height": 60},
//!         "content": "<b>You're invited!</b><script>alert(1)</script>"
//!     }]
//! }"#).unwrap();
//! assert!(html.contains("<b>You're invited!</b>"));
//! assert!(!html.contains("<script>"));
//! ```

pub mod defaults;
pub mod error;
pub mod geometry;
pub mod lint;
pub mod model;
pub mod page;
pub mod renderer;
pub mod sanitizer;

pub use defaults::{DefaultsError, RenderDefaults};
pub use error::DocumentError;
pub use geometry::Geometry;
pub use lint::{LintCategory, LintWarning};
pub use model::{
    Canvas, DesignElement, ElementKind, ElementSlot, ElementStyle, InvitationDocument, Position,
    Size,
};
pub use page::{render_page, PageOptions};
pub use renderer::{render, render_canvas_html, HtmlConfig, RenderNode};
pub use sanitizer::{sanitize, MarkupSanitizer, PlainTextSanitizer, Sanitizer, SanitizerMode};

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The input document could not be read or decoded
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The defaults table could not be loaded
    #[error(transparent)]
    Defaults(#[from] DefaultsError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Defaults table for every optional element attribute
    pub defaults: RenderDefaults,
    /// HTML output configuration
    pub html: HtmlConfig,
    /// Which sanitizer content passes through
    pub sanitizer: SanitizerMode,
    /// Target of the RSVP call-to-action on the page
    pub rsvp_href: Option<String>,
    /// Debug mode: print resolved element geometry to stderr
    pub debug: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the defaults table
    pub fn with_defaults(mut self, defaults: RenderDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the HTML configuration
    pub fn with_html(mut self, config: HtmlConfig) -> Self {
        self.html = config;
        self
    }

    /// Load the defaults table from a TOML file
    pub fn with_defaults_file(self, path: &Path) -> Result<Self, RenderError> {
        let defaults = RenderDefaults::from_file(path)?;
        Ok(self.with_defaults(defaults))
    }

    /// Select the sanitizer
    pub fn with_sanitizer(mut self, mode: SanitizerMode) -> Self {
        self.sanitizer = mode;
        self
    }

    /// Set the RSVP link target
    pub fn with_rsvp_href(mut self, href: impl Into<String>) -> Self {
        self.rsvp_href = Some(href.into());
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Page options derived from this configuration
    pub fn page_options(&self) -> PageOptions {
        let options = PageOptions::new()
            .with_html(self.html.clone())
            .with_defaults(self.defaults.clone());
        match &self.rsvp_href {
            Some(href) => options.with_rsvp_href(href.clone()),
            None => options,
        }
    }
}

/// A decoded document with its render nodes
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub document: InvitationDocument,
    pub canvas: Canvas,
    pub nodes: Vec<RenderNode>,
}

/// Read a document's source text from a file
pub fn read_document_source(path: &Path) -> Result<String, RenderError> {
    let source = std::fs::read_to_string(path).map_err(DocumentError::from)?;
    Ok(source)
}

/// Render a JSON invitation document to a canvas fragment with default
/// configuration
///
/// This is the main entry point for the library. It decodes the document,
/// renders every element and serializes the canvas container.
pub fn render_document_html(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a JSON invitation document to a canvas fragment
///
/// # Example
///
/// ```rust
/// use invite_render::{render_with_config, HtmlConfig, RenderConfig, SanitizerMode};
///
/// let config = RenderConfig::new()
///     .with_sanitizer(SanitizerMode::PlainText)
///     .with_html(HtmlConfig::new().with_pretty_print(false));
///
/// let html = render_with_config(
///     r#"{"invitation": {"title": "T"}, "elements": []}"#,
///     config,
/// ).unwrap();
/// assert!(html.starts_with(r#"<div class="inv-canvas""#));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let rendered = render_document(source, &config)?;
    Ok(render_canvas_html(
        &rendered.nodes,
        &rendered.canvas,
        &config.defaults,
        &config.html,
    ))
}

/// Decode a document and render its elements to nodes
pub fn render_document(source: &str, config: &RenderConfig) -> Result<RenderedDocument, RenderError> {
    let document = InvitationDocument::from_json(source)?;
    let canvas = document.canvas(&config.defaults.canvas);
    let sanitizer = config.sanitizer.build();
    let nodes = renderer::render_slots(
        &document.elements,
        &canvas,
        &config.defaults,
        sanitizer.as_ref(),
    );

    if config.debug {
        print_geometry(&nodes);
    }

    Ok(RenderedDocument {
        document,
        canvas,
        nodes,
    })
}

/// Render a JSON invitation document to a full page
///
/// `now` decides whether the RSVP call-to-action is shown.
pub fn render_page_source(
    source: &str,
    config: &RenderConfig,
    now: DateTime<Utc>,
) -> Result<String, RenderError> {
    let rendered = render_document(source, config)?;
    Ok(render_page(
        &rendered.document,
        &rendered.nodes,
        &config.page_options(),
        now,
    ))
}

/// Decode a document and lint its element list
pub fn lint_source(source: &str, config: &RenderConfig) -> Result<Vec<LintWarning>, RenderError> {
    let document = InvitationDocument::from_json(source)?;
    let canvas = document.canvas(&config.defaults.canvas);
    let sanitizer = config.sanitizer.build();
    Ok(lint::check(&document.elements, &canvas, sanitizer.as_ref()))
}

fn print_geometry(nodes: &[RenderNode]) {
    eprintln!("=== Geometry Debug ===");
    for (index, node) in nodes.iter().enumerate() {
        match node {
            RenderNode::Positioned(node) => {
                let g = &node.geometry;
                eprintln!(
                    "#{} [{}] {} x={:.1} y={:.1} w={:.1} h={:.1} rot={:.1} op={:.2} z={}",
                    index,
                    node.id,
                    node.kind.as_str(),
                    g.left,
                    g.top,
                    g.width,
                    g.height,
                    g.rotation,
                    g.opacity,
                    g.z_index
                );
            }
            RenderNode::Empty => eprintln!("#{} <empty>", index),
        }
    }
    eprintln!("======================");
}
