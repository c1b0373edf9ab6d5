use super::utils::{emit, format_inventory, render_result};
use pretty_assertions::assert_eq;
use webtag::page::PageInfo;
use webtag::types::{Inventory, OutputFormat, Role, TagMetadata};

fn inventory() -> Inventory {
    Inventory {
        data: vec![
            TagMetadata {
                xpath: "//html/body/button[@id=\"go\"]".to_string(),
                aria_label: Some("Submit order".to_string()),
                text_node_index: None,
                label: "0".to_string(),
                role: Role::Clickable,
            },
            TagMetadata {
                xpath: "//html/body/p".to_string(),
                aria_label: None,
                text_node_index: Some(1),
                label: "1".to_string(),
                role: Role::Text,
            },
        ],
    }
}

#[test]
fn test_simple_format_lists_one_target_per_line() {
    let rendered = format_inventory(&inventory(), OutputFormat::Simple).unwrap();
    assert_eq!(
        rendered,
        "[0] clickable //html/body/button[@id=\"go\"] \"Submit order\"\n\
         [1] text //html/body/p (text 1)"
    );
}

#[test]
fn test_json_format_round_trips() {
    let rendered = format_inventory(&inventory(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["data"][0]["ariaLabel"], "Submit order");
    assert_eq!(value["data"][1]["textNodeIndex"], 1);
    assert!(value["data"][1].get("ariaLabel").is_none());
    assert_eq!(Inventory::from_value(value).unwrap(), inventory());
}

#[test]
fn test_emit_writes_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.txt");
    emit("[0] clickable //html/body/a", Some(&path)).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[0] clickable //html/body/a"
    );
}

#[test]
fn test_page_context_is_added_to_json_only() {
    let page = PageInfo {
        url: Some("https://shop.example/cart".to_string()),
        focused_label: Some("0".to_string()),
        ..Default::default()
    };

    let rendered = render_result(&inventory(), OutputFormat::Json, None, Some(&page)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["page"]["focusedLabel"], "0");
    assert_eq!(value["data"].as_array().unwrap().len(), 2);
    assert!(value.get("plan").is_none());

    assert_eq!(
        render_result(&inventory(), OutputFormat::Simple, None, Some(&page)).unwrap(),
        format_inventory(&inventory(), OutputFormat::Simple).unwrap()
    );
}
