//! Page-level context captured next to the node tree: the visual viewport,
//! structured metadata the page publishes, and which tagged target has
//! keyboard focus.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::dom::{Dom, NodeId};
use crate::types::Inventory;
use crate::xpath::resolve;

/// `window.visualViewport` plus the document element's client and scroll
/// sizes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualViewport {
    pub width: f64,
    pub height: f64,
    pub offset_left: f64,
    pub offset_top: f64,
    pub page_left: f64,
    pub page_top: f64,
    pub scale: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

/// Structured data published by the top-level document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// `application/ld+json` blocks; a block that is not valid JSON is kept
    /// as its source text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_ld: Vec<Value>,
    /// One object per top-level `itemscope`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub microdata: Vec<Value>,
    /// `content` of each `<meta>` keyed by its `name` or `property`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta_tags: BTreeMap<String, String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.json_ld.is_empty() && self.microdata.is_empty() && self.meta_tags.is_empty()
    }
}

/// Context reported next to an inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_viewport: Option<VisualViewport>,
    #[serde(default, skip_serializing_if = "PageMetadata::is_empty")]
    pub metadata: PageMetadata,
    /// Label of the innermost tagged target containing the focused element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused_label: Option<String>,
}

/// Label of the innermost element target that is `focused` or one of its
/// ancestors. Text-run entries never hold focus.
pub fn focused_label<D: Dom + ?Sized>(
    dom: &D,
    inventory: &Inventory,
    focused: NodeId,
) -> Option<String> {
    let mut targets: HashMap<NodeId, &str> = HashMap::new();
    for entry in inventory.data.iter().filter(|e| e.text_node_index.is_none()) {
        if let Ok(nodes) = resolve(dom, &entry.xpath)
            && let [node] = nodes.as_slice()
        {
            targets.insert(*node, entry.label.as_str());
        }
    }

    let mut cursor = Some(focused);
    while let Some(node) = cursor {
        if let Some(label) = targets.get(&node) {
            return Some(label.to_string());
        }
        cursor = dom.parent(node);
    }
    None
}

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;
