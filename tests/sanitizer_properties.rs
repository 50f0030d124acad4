//! Properties every sanitizer output must satisfy, checked over a corpus of
//! hostile and ordinary inputs.

use invite_render::sanitizer::fragment::{Fragment, Node};
use invite_render::sanitizer::policy::{ALLOWED_ATTRIBUTES, ALLOWED_TAGS};
use invite_render::{sanitize, MarkupSanitizer, PlainTextSanitizer, Sanitizer, SanitizerMode};
use pretty_assertions::assert_eq;

const CORPUS: &[&str] = &[
    "",
    "plain words",
    "<b>bold</b> and <i>italic</i>",
    "<p class=\"lead\">Hello <strong>there</strong></p>",
    "<script>alert(1)</script>after",
    "<SCRIPT SRC=//evil.example/x.js></SCRIPT>",
    "<img src=x onerror=alert(1)>",
    "<a href=\"javascript:alert(1)\">click</a>",
    "<div onmouseover=\"steal()\" data-track=\"1\" id=\"x\">hover</div>",
    "<span style=\"color:red\">red</span>",
    "<span style=\"background:url(javascript:alert(1))\">bg</span>",
    "<span style=\"width:expression(alert(1))\">ie</span>",
    "<iframe src=\"https://evil.example\"></iframe>frame",
    "<svg onload=alert(1)><circle r=1></circle></svg>",
    "<math><mi>x</mi></math>",
    "<style>body{display:none}</style>styled",
    "<form action=/steal><input name=p></form>",
    "<!-- comment --><b>after comment</b>",
    "<!DOCTYPE html><p>doc</p>",
    "<p>unclosed <b>bold <i>both",
    "</b>stray end</p>",
    "<<script>script>alert(1)<</script>/script>",
    "5 < 6 && 7 > 3",
    "&lt;b&gt;escaped&lt;/b&gt;",
    "&amp;amp; &#60;script&#62; &#x3c;b&#x3e;",
    "<b title=\"a > b\">quoted gt</b>",
    "<br><br/><BR>",
    "<textarea><b>raw</b></textarea>x",
    "<noscript><img src=x onerror=alert(1)></noscript>",
    "<p><div><span>nested</span></div></p>",
    "<b",
    "<",
    "text <",
    "<span style='font-family:\"Comic Sans\"'>font</span>",
];

fn assert_allowed(nodes: &[Node], input: &str) {
    for node in nodes {
        if let Node::Element(element) = node {
            assert!(
                ALLOWED_TAGS.contains(&element.name.as_str()),
                "tag <{}> survived sanitizing {:?}",
                element.name,
                input
            );
            for (name, value) in &element.attributes {
                assert!(
                    ALLOWED_ATTRIBUTES.contains(&name.as_str()),
                    "attribute {} survived sanitizing {:?}",
                    name,
                    input
                );
                let lowered = value.to_ascii_lowercase();
                assert!(!lowered.contains("javascript:"), "{:?}", input);
                assert!(!lowered.contains("url("), "{:?}", input);
                assert!(!lowered.contains("expression("), "{:?}", input);
            }
            assert_allowed(&element.children, input);
        }
    }
}

#[test]
fn test_output_contains_only_allowed_markup() {
    for input in CORPUS {
        let output = sanitize(input);
        assert_allowed(&Fragment::parse(&output).nodes, input);
        assert!(!output.to_ascii_lowercase().contains("<script"), "{:?}", input);
    }
}

#[test]
fn test_no_event_handlers_or_data_attributes() {
    for input in CORPUS {
        let output = sanitize(input).to_ascii_lowercase();
        assert!(!output.contains(" on"), "{:?} -> {:?}", input, output);
        assert!(!output.contains("data-"), "{:?} -> {:?}", input, output);
        assert!(!output.contains(" id="), "{:?} -> {:?}", input, output);
    }
}

#[test]
fn test_forbidden_subtrees_leave_no_content() {
    assert_eq!(sanitize("<script>alert(1)</script>after"), "after");
    assert_eq!(sanitize("<style>body{display:none}</style>styled"), "styled");
    assert_eq!(sanitize("<iframe src=\"https://evil.example\"></iframe>frame"), "frame");
    assert_eq!(sanitize("<textarea><b>raw</b></textarea>x"), "x");
    assert_eq!(sanitize("<svg onload=alert(1)><circle r=1></circle></svg>"), "");
}

#[test]
fn test_plain_text_never_emits_tags() {
    for input in CORPUS {
        let output = PlainTextSanitizer.sanitize(input);
        assert!(!output.contains('<'), "{:?} -> {:?}", input, output);
        assert!(!output.contains('>'), "{:?} -> {:?}", input, output);
    }
    assert_eq!(
        PlainTextSanitizer.sanitize("<p>Hello <strong>there</strong></p>"),
        "Hello there"
    );
}

#[test]
fn test_sanitizing_twice_changes_nothing() {
    for mode in [SanitizerMode::Markup, SanitizerMode::PlainText] {
        let sanitizer = mode.build();
        for input in CORPUS {
            let once = sanitizer.sanitize(input);
            let twice = sanitizer.sanitize(&once);
            assert_eq!(twice, once, "{} sanitizer on {:?}", mode, input);
        }
    }
}

#[test]
fn test_sanitized_output_reports_no_removals() {
    for input in CORPUS {
        let once = MarkupSanitizer.sanitize(input);
        assert!(
            !MarkupSanitizer.clean(&once).altered(),
            "{:?} -> {:?}",
            input,
            once
        );
    }
}

#[test]
fn test_deep_nesting_is_bounded() {
    let input = format!("{}deep{}", "<span>".repeat(500), "</span>".repeat(500));
    let output = sanitize(&input);
    assert!(output.contains("deep"));
    assert_eq!(sanitize(&output), output);
}
