// Unit tests for page context

use super::*;
use crate::config::TaggingConfig;
use crate::dom::fixture::{page, rect, with_text};
use crate::dom::ElementSpec;
use crate::tagger::PageTagger;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_focus_inside_a_target_reports_its_label() {
    let (mut dom, body) = page();
    with_text(&mut dom, body, "p", rect(0.0, 0.0, 300.0, 20.0), "Intro");
    let button = dom.append_element(
        body,
        ElementSpec::new("button").attr("id", "pay").rect(0.0, 40.0, 80.0, 24.0),
    );
    let icon = dom.append_element(button, ElementSpec::new("i").rect(2.0, 42.0, 10.0, 10.0));
    dom.append_text(button, "Pay");

    let config = TaggingConfig::default();
    let inventory = PageTagger::new(&mut dom, &config)
        .unwrap()
        .tag_page(true)
        .unwrap();

    assert_eq!(focused_label(&dom, &inventory, icon), Some("1".to_string()));
    assert_eq!(focused_label(&dom, &inventory, button), Some("1".to_string()));
    // Text runs are skipped even when their element is focused
    let paragraph = dom.element_children(body)[0];
    assert_eq!(focused_label(&dom, &inventory, paragraph), None);
    assert_eq!(focused_label(&dom, &inventory, body), None);
}

#[test]
fn test_page_info_omits_empty_parts() {
    let info = PageInfo {
        url: Some("https://shop.example/".to_string()),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&info).unwrap(),
        json!({"url": "https://shop.example/"})
    );

    let mut metadata = PageMetadata::default();
    assert!(metadata.is_empty());
    metadata
        .meta_tags
        .insert("og:title".to_string(), "Checkout".to_string());
    metadata.json_ld.push(json!({"@type": "Product"}));
    let info = PageInfo {
        metadata,
        focused_label: Some("3".to_string()),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&info).unwrap(),
        json!({
            "metadata": {
                "jsonLd": [{"@type": "Product"}],
                "metaTags": {"og:title": "Checkout"}
            },
            "focusedLabel": "3"
        })
    );
}

#[test]
fn test_visual_viewport_fills_missing_fields() {
    let viewport: VisualViewport =
        serde_json::from_value(json!({"width": 800.0, "height": 600.0, "scale": 1.0})).unwrap();
    assert_eq!(viewport.width, 800.0);
    assert_eq!(viewport.scroll_height, 0.0);
}
