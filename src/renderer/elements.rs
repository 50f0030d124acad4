//! Per-kind rendering of design elements
//!
//! Each known [`ElementKind`] has one function here producing the body of
//! the element's wrapper. All missing or unusable style values are taken
//! from [`RenderDefaults`].

use crate::defaults::RenderDefaults;
use crate::geometry::Geometry;
use crate::model::{DesignElement, ElementKind, ElementStyle, LineStyle};
use crate::sanitizer::Sanitizer;

use super::node::{HtmlNode, PositionedNode, RenderNode};
use super::style::{
    css_or, font_weight_css, length_css, length_px, line_height_css, num, px, safe_css_value,
    safe_image_url, Declarations,
};

/// Shared inputs of one render pass
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub defaults: &'a RenderDefaults,
    pub sanitizer: &'a dyn Sanitizer,
}

impl<'a> RenderContext<'a> {
    pub fn new(defaults: &'a RenderDefaults, sanitizer: &'a dyn Sanitizer) -> Self {
        Self {
            defaults,
            sanitizer,
        }
    }
}

/// Render one element
pub fn render_element(element: &DesignElement, ctx: &RenderContext) -> RenderNode {
    let geometry = Geometry::of(element);
    let content = match &element.kind {
        ElementKind::Text => text(element, ctx),
        ElementKind::Image => image(element, ctx),
        ElementKind::Shape => shape(element, &geometry, ctx),
        ElementKind::Icon => icon(element, &geometry, ctx),
        ElementKind::Divider => divider(element, ctx),
        ElementKind::Unknown(kind) => {
            log::warn!(
                "element '{}' has unknown type '{}', rendering nothing",
                element.id,
                kind
            );
            return RenderNode::Empty;
        }
    };

    RenderNode::Positioned(PositionedNode {
        id: element.id.clone(),
        kind: element.kind.clone(),
        geometry,
        content,
    })
}

/// Declarations shared by every body: fill the wrapper
fn fill() -> Declarations {
    let mut decls = Declarations::new();
    decls
        .push("width", "100%")
        .push("height", "100%")
        .push("box-sizing", "border-box");
    decls
}

fn text(element: &DesignElement, ctx: &RenderContext) -> HtmlNode {
    let defaults = &ctx.defaults.text;
    let style = &element.style;
    let align = style.text_align().unwrap_or(defaults.text_align);
    let vertical = style.vertical_align().unwrap_or(defaults.vertical_align);

    let mut decls = fill();
    decls
        .push("display", "flex")
        .push("justify-content", align.justify_content())
        .push("align-items", vertical.align_items())
        .push("text-align", align.css())
        .push(
            "font-family",
            css_or(style.font_family.as_deref(), &defaults.font_family),
        )
        .push(
            "font-size",
            style
                .font_size
                .as_ref()
                .and_then(length_css)
                .unwrap_or_else(|| px(defaults.font_size)),
        )
        .push(
            "font-weight",
            style
                .font_weight
                .as_ref()
                .and_then(font_weight_css)
                .unwrap_or_else(|| defaults.font_weight.clone()),
        )
        .push("color", css_or(style.color.as_deref(), &defaults.color))
        .push(
            "line-height",
            style
                .line_height
                .as_ref()
                .and_then(line_height_css)
                .unwrap_or_else(|| num(defaults.line_height)),
        )
        .push(
            "padding",
            style
                .padding
                .as_ref()
                .and_then(length_css)
                .unwrap_or_else(|| px(defaults.padding)),
        );
    push_optional_text_styles(&mut decls, style);

    let sanitized = ctx.sanitizer.sanitize(element.content());
    let mut body = Declarations::new();
    body.push("width", "100%");
    HtmlNode::new("div")
        .with_style(decls)
        .with_child(HtmlNode::new("div").with_style(body).with_markup(sanitized))
}

/// Text attributes without a default: emitted only when given and safe
fn push_optional_text_styles(decls: &mut Declarations, style: &ElementStyle) {
    decls
        .push_opt("font-style", safe_owned(style.font_style.as_deref()))
        .push_opt("text-decoration", safe_owned(style.text_decoration.as_deref()))
        .push_opt(
            "letter-spacing",
            style.letter_spacing.as_ref().and_then(length_css),
        )
        .push_opt(
            "background-color",
            safe_owned(style.background_color.as_deref()),
        )
        .push_opt(
            "border-radius",
            style.border_radius.as_ref().and_then(length_css),
        );
}

fn safe_owned(value: Option<&str>) -> Option<String> {
    value.and_then(safe_css_value).map(str::to_string)
}

fn image(element: &DesignElement, ctx: &RenderContext) -> HtmlNode {
    let mut decls = fill();
    decls.push("overflow", "hidden").push_opt(
        "border-radius",
        element.style.border_radius.as_ref().and_then(length_css),
    );
    let container = HtmlNode::new("div").with_style(decls);

    let raw = element.content().trim();
    let Some(url) = safe_image_url(raw) else {
        if !raw.is_empty() {
            log::warn!("image '{}' has a rejected URL, rendering an empty box", element.id);
        }
        return container;
    };

    let mut img = Declarations::new();
    img.push("display", "block")
        .push("width", "100%")
        .push("height", "100%")
        .push("object-fit", ctx.defaults.image.fit.trim());
    container.with_child(
        HtmlNode::new("img")
            .with_attribute("src", url)
            .with_attribute("alt", "")
            .with_style(img),
    )
}

/// Shape kind tokens accepted in a shape element's `content`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Rounded,
    Circle,
    Ellipse,
    Triangle,
    Diamond,
}

impl ShapeKind {
    /// Parse a shape token; unknown or empty tokens are rectangles
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "rounded" | "rounded-rectangle" | "rounded_rectangle" => ShapeKind::Rounded,
            "circle" => ShapeKind::Circle,
            "ellipse" | "oval" => ShapeKind::Ellipse,
            "triangle" => ShapeKind::Triangle,
            "diamond" => ShapeKind::Diamond,
            _ => ShapeKind::Rectangle,
        }
    }
}

fn shape(element: &DesignElement, geometry: &Geometry, ctx: &RenderContext) -> HtmlNode {
    let defaults = &ctx.defaults.shape;
    let style = &element.style;
    let kind = ShapeKind::parse(element.content());

    let mut decls = if kind == ShapeKind::Circle {
        // largest centered circle that fits the box
        let diameter = geometry.width.min(geometry.height);
        let mut decls = Declarations::new();
        decls
            .push_px("width", diameter)
            .push_px("height", diameter)
            .push(
                "margin",
                format!(
                    "{} {}",
                    px((geometry.height - diameter) / 2.0),
                    px((geometry.width - diameter) / 2.0)
                ),
            )
            .push("box-sizing", "border-box");
        decls
    } else {
        fill()
    };
    decls.push(
        "background-color",
        css_or(style.background_color.as_deref(), &defaults.background_color),
    );

    let has_border =
        style.border_color.is_some() || style.border_width.is_some() || style.border_style.is_some();
    if has_border {
        let width = length_px(style.border_width.as_ref()).unwrap_or(defaults.border_width);
        let line = style.line_style().unwrap_or(defaults.border_style);
        let color = css_or(style.border_color.as_deref(), &defaults.border_color);
        decls.push("border", format!("{} {} {}", px(width), line.css(), color));
    }

    let explicit_radius = style.border_radius.as_ref().and_then(length_css);
    match kind {
        ShapeKind::Rectangle => {
            decls.push_opt("border-radius", explicit_radius);
        }
        ShapeKind::Rounded => {
            decls.push(
                "border-radius",
                explicit_radius.unwrap_or_else(|| px(defaults.rounded_radius)),
            );
        }
        ShapeKind::Circle | ShapeKind::Ellipse => {
            decls.push("border-radius", "50%");
        }
        ShapeKind::Triangle => {
            decls.push("clip-path", "polygon(50% 0%, 100% 100%, 0% 100%)");
        }
        ShapeKind::Diamond => {
            decls.push("clip-path", "polygon(50% 0%, 100% 50%, 50% 100%, 0% 50%)");
        }
    }

    HtmlNode::new("div").with_style(decls)
}

fn icon(element: &DesignElement, geometry: &Geometry, ctx: &RenderContext) -> HtmlNode {
    let defaults = &ctx.defaults.icon;
    let glyph = defaults.scale * geometry.width.min(geometry.height);

    let mut decls = fill();
    decls
        .push("display", "flex")
        .push("align-items", "center")
        .push("justify-content", "center")
        .push_px("font-size", glyph)
        .push("line-height", "1")
        .push("color", css_or(element.style.color.as_deref(), &defaults.color));

    HtmlNode::new("div")
        .with_style(decls)
        .with_markup(ctx.sanitizer.sanitize(element.content()))
}

fn divider(element: &DesignElement, ctx: &RenderContext) -> HtmlNode {
    let defaults = &ctx.defaults.divider;
    let style = &element.style;
    let thickness = length_px(style.border_width.as_ref()).unwrap_or(defaults.thickness);
    let line = style.line_style().unwrap_or(defaults.style);
    let color = css_or(style.color.as_deref(), &defaults.color);

    let mut decls = fill();
    decls.push("display", "flex").push("align-items", "center");

    // the rule always spans the full box; the element width is not a length
    let mut rule = Declarations::new();
    rule.push("width", "100%")
        .push("margin", "0")
        .push("border", "none")
        .push(
            "border-top",
            format!("{} {} {}", px(thickness), line.css(), color),
        );
    if line == LineStyle::Dotted {
        rule.push("border-radius", "9999px");
    }

    HtmlNode::new("div")
        .with_style(decls)
        .with_child(HtmlNode::new("hr").with_style(rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Length, Position, Size};
    use crate::sanitizer::{MarkupSanitizer, PlainTextSanitizer};

    fn render(element: &DesignElement) -> RenderNode {
        let defaults = RenderDefaults::default();
        render_element(element, &RenderContext::new(&defaults, &MarkupSanitizer))
    }

    fn body(node: &RenderNode) -> &HtmlNode {
        &node.positioned().expect("positioned node").content
    }

    fn element(kind: &str) -> DesignElement {
        DesignElement::new("e", kind, Position::new(0.0, 0.0), Size::new(200.0, 100.0))
    }

    #[test]
    fn test_text_defaults() {
        let node = render(&element("text").with_content("Hello"));
        let style = &body(&node).style;
        assert_eq!(style.get("font-family"), Some("inherit"));
        assert_eq!(style.get("font-size"), Some("16px"));
        assert_eq!(style.get("font-weight"), Some("normal"));
        assert_eq!(style.get("color"), Some("#000000"));
        assert_eq!(style.get("line-height"), Some("1.5"));
        assert_eq!(style.get("padding"), Some("4px"));
        assert_eq!(style.get("justify-content"), Some("flex-start"));
        assert_eq!(style.get("align-items"), Some("flex-start"));
        assert_eq!(body(&node).markup(), "Hello");
    }

    #[test]
    fn test_text_alignment_maps_to_flex() {
        let style = ElementStyle {
            text_align: Some("center".to_string()),
            vertical_align: Some("middle".to_string()),
            ..Default::default()
        };
        let node = render(&element("text").with_style(style));
        let decls = &body(&node).style;
        assert_eq!(decls.get("text-align"), Some("center"));
        assert_eq!(decls.get("justify-content"), Some("center"));
        assert_eq!(decls.get("align-items"), Some("center"));
    }

    #[test]
    fn test_text_content_is_sanitized_markup() {
        let node = render(&element("text").with_content("<b>hi</b><script>x</script>"));
        assert_eq!(body(&node).markup(), "<b>hi</b>");

        let defaults = RenderDefaults::default();
        let ctx = RenderContext::new(&defaults, &PlainTextSanitizer);
        let plain = render_element(&element("text").with_content("<b>hi</b>"), &ctx);
        assert_eq!(body(&plain).markup(), "hi");
    }

    #[test]
    fn test_text_unsafe_style_values_fall_back() {
        let style = ElementStyle {
            color: Some("red;background:url(x)".to_string()),
            font_size: Some(Length::from("20px")),
            ..Default::default()
        };
        let node = render(&element("text").with_style(style));
        assert_eq!(body(&node).style.get("color"), Some("#000000"));
        assert_eq!(body(&node).style.get("font-size"), Some("20px"));
    }

    #[test]
    fn test_image() {
        let style = ElementStyle {
            border_radius: Some(Length::Number(8.0)),
            ..Default::default()
        };
        let node = render(
            &element("image")
                .with_content("https://example.com/a.jpg")
                .with_style(style),
        );
        let content = body(&node);
        assert_eq!(content.style.get("border-radius"), Some("8px"));
        let img = content.find("img").expect("img");
        assert_eq!(img.attribute("src"), Some("https://example.com/a.jpg"));
        assert_eq!(img.style.get("object-fit"), Some("cover"));
    }

    #[test]
    fn test_image_fit_from_defaults() {
        let mut defaults = RenderDefaults::default();
        defaults.image.fit = "contain".to_string();
        let ctx = RenderContext::new(&defaults, &MarkupSanitizer);
        let node = render_element(
            &element("image").with_content("https://example.com/a.jpg"),
            &ctx,
        );
        let img = body(&node).find("img").expect("img");
        assert_eq!(img.style.get("object-fit"), Some("contain"));
    }

    #[test]
    fn test_image_missing_or_unsafe_url_is_empty_box() {
        for url in ["", "   ", "javascript:alert(1)"] {
            let node = render(&element("image").with_content(url));
            assert!(!node.is_empty());
            assert!(body(&node).find("img").is_none(), "{url:?}");
        }
    }

    #[test]
    fn test_shape_defaults_and_border() {
        let node = render(&element("shape"));
        assert_eq!(body(&node).style.get("background-color"), Some("#e0e0e0"));
        assert_eq!(body(&node).style.get("border"), None);

        let style = ElementStyle {
            border_color: Some("#ff0000".to_string()),
            border_width: Some(Length::Number(3.0)),
            border_style: Some("dashed".to_string()),
            ..Default::default()
        };
        let node = render(&element("shape").with_style(style));
        assert_eq!(body(&node).style.get("border"), Some("3px dashed #ff0000"));
    }

    #[test]
    fn test_shape_kinds() {
        assert_eq!(ShapeKind::parse("Circle"), ShapeKind::Circle);
        assert_eq!(ShapeKind::parse("hexagon"), ShapeKind::Rectangle);

        let circle = render(&element("shape").with_content("circle"));
        let decls = &body(&circle).style;
        assert_eq!(decls.get("width"), Some("100px"));
        assert_eq!(decls.get("margin"), Some("0px 50px"));
        assert_eq!(decls.get("border-radius"), Some("50%"));

        let rounded = render(&element("shape").with_content("rounded"));
        assert_eq!(body(&rounded).style.get("border-radius"), Some("12px"));

        let triangle = render(&element("shape").with_content("triangle"));
        assert!(body(&triangle).style.get("clip-path").is_some());
    }

    #[test]
    fn test_icon_scales_to_smaller_side() {
        let node = render(&element("icon").with_content("&#x2764;"));
        assert_eq!(body(&node).style.get("font-size"), Some("80px"));
        assert_eq!(body(&node).markup(), "\u{2764}");
    }

    #[test]
    fn test_divider() {
        let node = render(&element("divider"));
        let rule = body(&node).find("hr").expect("hr");
        assert_eq!(rule.style.get("width"), Some("100%"));
        assert_eq!(rule.style.get("border-top"), Some("2px solid #000000"));
        assert_eq!(rule.style.get("border-radius"), None);

        let style = ElementStyle {
            border_width: Some(Length::from("4px")),
            border_style: Some("dotted".to_string()),
            color: Some("#c0a060".to_string()),
            ..Default::default()
        };
        let node = render(&element("divider").with_style(style));
        let rule = body(&node).find("hr").expect("hr");
        assert_eq!(rule.style.get("border-top"), Some("4px dotted #c0a060"));
        assert_eq!(rule.style.get("border-radius"), Some("9999px"));
    }

    #[test]
    fn test_unknown_kind_renders_empty() {
        assert!(render(&element("bogus")).is_empty());
    }
}
