//! Public invitation page
//!
//! Wraps the rendered canvas in a page with the invitation details and,
//! when RSVPs are open, a call-to-action link. Every metadata string is
//! emitted as escaped text; only sanitized element content is markup.

use chrono::{DateTime, NaiveDate, Utc};

use crate::defaults::RenderDefaults;
use crate::model::{parse_timestamp, InvitationDocument};
use crate::renderer::html::write_canvas;
use crate::renderer::{HtmlBuilder, HtmlConfig, RenderNode};

/// Options for the hosting page
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Target of the RSVP call-to-action link
    pub rsvp_href: String,
    pub rsvp_label: String,
    pub html: HtmlConfig,
    pub defaults: RenderDefaults,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            rsvp_href: "#rsvp".to_string(),
            rsvp_label: "RSVP".to_string(),
            html: HtmlConfig::default(),
            defaults: RenderDefaults::default(),
        }
    }
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rsvp_href(mut self, href: impl Into<String>) -> Self {
        self.rsvp_href = href.into();
        self
    }

    pub fn with_rsvp_label(mut self, label: impl Into<String>) -> Self {
        self.rsvp_label = label.into();
        self
    }

    pub fn with_html(mut self, html: HtmlConfig) -> Self {
        self.html = html;
        self
    }

    pub fn with_defaults(mut self, defaults: RenderDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Whether the RSVP call-to-action is shown at `now`
pub fn rsvp_is_open(document: &InvitationDocument, now: DateTime<Utc>) -> bool {
    document.rsvp.is_open(now)
}

/// Human-readable event date: `Saturday, June 1, 2024 at 6:00 PM`.
///
/// Bare dates omit the time; unparseable input is returned as written.
pub fn format_event_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%A, %B %-d, %Y").to_string();
    }
    match parse_timestamp(trimmed) {
        Some(when) => when.format("%A, %B %-d, %Y at %-I:%M %p").to_string(),
        None => trimmed.to_string(),
    }
}

/// Render the page for a document and its render nodes
pub fn render_page(
    document: &InvitationDocument,
    nodes: &[RenderNode],
    options: &PageOptions,
    now: DateTime<Utc>,
) -> String {
    let mut builder = HtmlBuilder::new(options.html.clone());
    let p = options.html.prefix().to_string();
    let class = |name: &str| [("class", format!("{}{}", p, name))];
    let title = document.invitation.title.trim();

    if options.html.standalone {
        builder.raw_line("<!DOCTYPE html>");
        builder.open("html", &[("lang", "en".to_string())], None);
        builder.open("head", &[], None);
        builder.raw_line(r#"<meta charset="utf-8">"#);
        builder.raw_line(
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
        );
        builder.text("title", &[], if title.is_empty() { "Invitation" } else { title });
        builder.close("head");
        builder.open("body", &[], None);
    }

    builder.open("main", &class("page"), None);
    builder.open("header", &class("details"), None);
    if !title.is_empty() {
        builder.text("h1", &class("title"), title);
    }
    if let Some(description) = non_blank(document.invitation.description.as_deref()) {
        builder.text("p", &class("description"), description);
    }
    if let Some(date) = non_blank(document.rsvp.event_date.as_deref()) {
        builder.text("p", &class("event-date"), &format_event_date(date));
    }
    if let Some(location) = non_blank(document.rsvp.event_location.as_deref()) {
        builder.text("p", &class("event-location"), location);
    }
    builder.close("header");

    let canvas = document.canvas(&options.defaults.canvas);
    write_canvas(&mut builder, nodes, &canvas, &options.defaults);

    if rsvp_is_open(document, now) {
        builder.text(
            "a",
            &[
                ("class", format!("{}rsvp", p)),
                ("href", options.rsvp_href.clone()),
            ],
            &options.rsvp_label,
        );
    } else if document.rsvp.enabled {
        builder.text("p", &class("rsvp-closed"), "RSVPs are closed");
    }
    builder.close("main");

    if options.html.standalone {
        builder.close("body");
        builder.close("html");
    }
    builder.build()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
