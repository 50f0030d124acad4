//! End-to-end rendering tests: JSON document in, render nodes and canvas
//! HTML out.

use std::fs;
use std::path::{Path, PathBuf};

use invite_render::{
    render_document, render_with_config, HtmlConfig, InvitationDocument, RenderConfig, RenderNode,
    SanitizerMode,
};
use pretty_assertions::assert_eq;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

fn compact() -> RenderConfig {
    RenderConfig::new().with_html(HtmlConfig::new().with_pretty_print(false))
}

fn doc(elements: &str) -> String {
    format!(r#"{{"invitation": {{"title": "Test"}}, "elements": [{}]}}"#, elements)
}

fn style_of(node: &RenderNode) -> String {
    node.positioned()
        .expect("positioned node")
        .content
        .style
        .to_css()
}

#[test]
fn test_garden_party_renders_every_slot() {
    let rendered = render_document(&fixture("garden_party.json"), &RenderConfig::default())
        .expect("fixture renders");
    assert_eq!(rendered.nodes.len(), 8);

    let ids: Vec<Option<&str>> = rendered
        .nodes
        .iter()
        .map(|n| n.positioned().map(|p| p.id.as_str()))
        .collect();
    assert_eq!(
        ids,
        vec![
            Some("backdrop"),
            Some("headline"),
            Some("photo"),
            Some("heart"),
            Some("rule"),
            None,
            None,
            Some("details"),
        ]
    );
    assert_eq!(rendered.canvas.width, 600.0);
    assert_eq!(rendered.canvas.height, 800.0);
}

#[test]
fn test_garden_party_html_is_safe() {
    let html = render_with_config(&fixture("garden_party.json"), RenderConfig::default())
        .expect("fixture renders");
    assert!(!html.contains("<script"));
    assert!(!html.contains("steal()"));
    assert!(!html.contains("onerror"));
    assert!(html.contains("<p><strong>You're invited!</strong></p>"));
    assert!(html.contains(r#"src="https://images.example.com/garden.jpg""#));
    assert!(html.contains("transform:rotate(-4deg)"));
    assert!(html.contains("Saturday at <b>2pm</b><br>Bring a hat "));
    assert!(!html.contains("legacy-sticker"));
    assert!(!html.contains("half-saved"));
}

#[test]
fn test_document_and_defaults_from_files() {
    let document = InvitationDocument::from_file(&fixture_path("garden_party.json"))
        .expect("fixture loads");
    assert_eq!(document.invitation.title, "Garden Party");
    assert_eq!(document.elements.len(), 8);

    let config = RenderConfig::new()
        .with_defaults_file(&fixture_path("defaults.toml"))
        .expect("defaults load");
    assert_eq!(config.defaults.text.color, "#333333");
    assert_eq!(config.defaults.image.fit, "contain");

    let source = doc(
        r#"{"id": "t", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}},
           {"id": "i", "type": "image", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10},
            "content": "https://example.com/a.png"}"#,
    );
    let html = render_with_config(&source, config).unwrap();
    assert!(html.contains("background-color:#fffaf0"));
    assert!(html.contains("font-family:Georgia, serif"));
    assert!(html.contains("color:#333333"));
    assert!(html.contains("object-fit:contain"));
}

#[test]
fn test_rendering_is_deterministic() {
    let source = fixture("garden_party.json");
    let first = render_with_config(&source, RenderConfig::default()).unwrap();
    let second = render_with_config(&source, RenderConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_order_follows_input_not_z_index() {
    let source = doc(
        r#"{"id": "top", "type": "shape", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}, "zIndex": 99},
           {"id": "bottom", "type": "shape", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}, "zIndex": -3}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    let top = rendered.nodes[0].positioned().unwrap();
    let bottom = rendered.nodes[1].positioned().unwrap();
    assert_eq!(top.id, "top");
    assert_eq!(top.geometry.z_index, 99);
    assert_eq!(bottom.id, "bottom");
    assert_eq!(bottom.geometry.z_index, -3);

    let html = render_with_config(&source, compact()).unwrap();
    let top_at = html.find(r#"data-element-id="top""#).unwrap();
    let bottom_at = html.find(r#"data-element-id="bottom""#).unwrap();
    assert!(top_at < bottom_at);
}

#[test]
fn test_missing_optionals_take_defaults() {
    let source = doc(
        r#"{"id": "plain", "type": "shape", "position": {"x": 5, "y": 6}, "size": {"width": 70, "height": 80}}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    let node = rendered.nodes[0].positioned().unwrap();
    assert_eq!(node.geometry.opacity, 1.0);
    assert_eq!(node.geometry.z_index, 0);
    assert_eq!(node.geometry.rotation, 0.0);

    let html = render_with_config(&source, compact()).unwrap();
    assert!(html.contains("z-index:0;opacity:1"));
    assert!(!html.contains("transform"));
}

#[test]
fn test_out_of_range_values_are_clamped() {
    let source = doc(
        r#"{"id": "a", "type": "shape", "position": {"x": 0, "y": 0}, "size": {"width": -20, "height": 10}, "opacity": 7, "zIndex": 2.9}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    let node = rendered.nodes[0].positioned().unwrap();
    assert_eq!(node.geometry.opacity, 1.0);
    assert_eq!(node.geometry.z_index, 2);
    assert_eq!(node.geometry.width, 0.0);
}

#[test]
fn test_unknown_type_renders_nothing() {
    let source = doc(
        r#"{"id": "u", "type": "hologram", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}, "content": "<script>x</script>"},
           {"id": "k", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}, "content": "kept"}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    assert!(rendered.nodes[0].is_empty());
    assert!(!rendered.nodes[1].is_empty());

    let html = render_with_config(&source, compact()).unwrap();
    assert!(!html.contains("hologram"));
    assert!(html.contains("kept"));
}

#[test]
fn test_divider_spans_full_width() {
    let source = doc(
        r##"{"id": "d1", "type": "divider", "position": {"x": 0, "y": 0}, "size": {"width": 400, "height": 10}},
           {"id": "d2", "type": "divider", "position": {"x": 0, "y": 20}, "size": {"width": 400, "height": 10},
            "style": {"borderWidth": 5, "color": "#123456", "borderStyle": "dashed"}}"##,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    for node in &rendered.nodes {
        let rule = node.positioned().unwrap().content.find("hr").expect("rule");
        assert_eq!(rule.style.get("width"), Some("100%"));
    }
    let first = rendered.nodes[0].positioned().unwrap().content.find("hr").unwrap();
    assert_eq!(first.style.get("border-top"), Some("2px solid #000000"));
    let second = rendered.nodes[1].positioned().unwrap().content.find("hr").unwrap();
    assert_eq!(second.style.get("border-top"), Some("5px dashed #123456"));
}

#[test]
fn test_empty_element_list() {
    let source = r#"{"invitation": {"title": "Empty"}, "elements": []}"#;
    let rendered = render_document(source, &RenderConfig::default()).unwrap();
    assert!(rendered.nodes.is_empty());

    let html = render_with_config(source, compact()).unwrap();
    assert_eq!(
        html,
        r#"<div class="inv-canvas" style="position:relative;width:800px;height:600px;background-color:#ffffff;overflow:hidden"></div>"#
    );
}

#[test]
fn test_missing_element_list_is_empty() {
    let rendered = render_document(r#"{"invitation": {"title": "T"}}"#, &RenderConfig::default())
        .unwrap();
    assert!(rendered.nodes.is_empty());
}

#[test]
fn test_malformed_record_keeps_its_slot() {
    let source = doc(
        r#"{"id": "a", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}},
           {"id": "b", "type": "text", "position": "nowhere"},
           {"id": "c", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    assert_eq!(rendered.nodes.len(), 3);
    assert!(rendered.nodes[1].is_empty());
    assert_eq!(rendered.nodes[2].positioned().unwrap().id, "c");
}

#[test]
fn test_mistyped_optional_fields_take_defaults() {
    let source = doc(
        r#"{"id": "c", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10},
            "content": "one", "style": {"color": 123}},
           {"id": "o", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10},
            "content": "two", "opacity": "0.5"},
           {"id": "w", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10},
            "content": "three", "style": {"fontWeight": true}}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    assert!(rendered.nodes.iter().all(|n| !n.is_empty()));

    let color = rendered.nodes[0].positioned().unwrap();
    assert_eq!(color.content.style.get("color"), Some("#000000"));
    assert_eq!(color.content.markup(), "one");

    let faded = rendered.nodes[1].positioned().unwrap();
    assert_eq!(faded.geometry.opacity, 1.0);
    assert_eq!(faded.content.markup(), "two");

    let weight = rendered.nodes[2].positioned().unwrap();
    assert_eq!(weight.content.style.get("font-weight"), Some("normal"));
}

#[test]
fn test_plain_text_mode_strips_markup() {
    let source = doc(
        r#"{"id": "t", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}, "content": "<b>bold</b> & <i>it</i>"}"#,
    );
    let config = compact().with_sanitizer(SanitizerMode::PlainText);
    let rendered = render_document(&source, &config).unwrap();
    let text = rendered.nodes[0].positioned().unwrap().content.find("div").unwrap();
    assert_eq!(text.markup(), "bold &amp; it");
}

#[test]
fn test_text_style_defaults_and_overrides() {
    let source = doc(
        r#"{"id": "t", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10},
            "style": {"fontSize": 24, "color": "red; background:url(x)", "textAlign": "right", "verticalAlign": "bottom"}}"#,
    );
    let rendered = render_document(&source, &RenderConfig::default()).unwrap();
    let css = style_of(&rendered.nodes[0]);
    assert!(css.contains("font-size:24px"));
    assert!(css.contains("color:#000000"));
    assert!(css.contains("justify-content:flex-end;align-items:flex-end;text-align:right"));
}

#[test]
fn test_canvas_html_snapshot() {
    let source = r##"{
        "invitation": {"title": "Snap", "settings": {"canvasWidth": 300, "canvasHeight": 200, "backgroundColor": "#fafafa"}},
        "elements": [
            {"id": "card", "type": "shape", "content": "circle", "position": {"x": 10, "y": 20},
             "size": {"width": 100, "height": 50}, "zIndex": 3, "opacity": 0.5},
            {"id": "rule", "type": "divider", "position": {"x": 0, "y": 100}, "size": {"width": 300, "height": 10},
             "style": {"borderWidth": 3, "borderStyle": "dotted", "color": "#aa8844"}}
        ]
    }"##;
    let html = render_with_config(source, RenderConfig::default()).unwrap();
    insta::assert_snapshot!(html, @r###"
    <div class="inv-canvas" style="position:relative;width:300px;height:200px;background-color:#fafafa;overflow:hidden">
      <div class="inv-element inv-shape" data-element-id="card" style="position:absolute;left:10px;top:20px;width:100px;height:50px;z-index:3;opacity:0.5">
        <div style="width:50px;height:50px;margin:0px 25px;box-sizing:border-box;background-color:#e0e0e0;border-radius:50%"></div>
      </div>
      <div class="inv-element inv-divider" data-element-id="rule" style="position:absolute;left:0px;top:100px;width:300px;height:10px;z-index:0;opacity:1">
        <div style="width:100%;height:100%;box-sizing:border-box;display:flex;align-items:center">
          <hr style="width:100%;margin:0;border:none;border-top:3px dotted #aa8844;border-radius:9999px">
        </div>
      </div>
    </div>
    "###);
}
