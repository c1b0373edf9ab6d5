//! Visibility and role predicates.
//!
//! Everything here is a read-only query over a [`Dom`]; nothing mutates the
//! page, so the predicates can be exercised against any tree.

use regex::Regex;

use crate::config::AriaNameMode;
use crate::dom::{Dom, NodeId};
use crate::types::Role;

lazy_static::lazy_static! {
    // JavaScript's `\w`, which is ASCII-only
    static ref WORD_CHAR: Regex = Regex::new(r"[A-Za-z0-9_]").unwrap();
}

/// Tags that may be associated with a `<label>`
const LABELABLE_TAGS: &[&str] = &["input", "textarea", "select", "button"];

/// Tags that are always interactable
const INTERACTIVE_TAGS: &[&str] = &["a", "button", "textarea", "select", "details", "label"];

/// `<input>` types that accept typed text
const TEXT_INPUT_TYPES: &[&str] = &["text", "password", "email", "search", "url", "tel", "number"];

/// Tags that may be empty and still interactable
const TEXTLESS_WHITELIST: &[&str] = &["input", "textarea", "select", "button", "a"];

/// Every `type` an `<input>` understands; anything else behaves as `text`
const KNOWN_INPUT_TYPES: &[&str] = &[
    "hidden",
    "text",
    "search",
    "tel",
    "url",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
    "range",
    "color",
    "checkbox",
    "radio",
    "file",
    "submit",
    "image",
    "reset",
    "button",
];

/// Effective `type` of an `<input>`, as the `el.type` property reports it
pub fn input_type<D: Dom + ?Sized>(dom: &D, node: NodeId) -> String {
    let declared = dom
        .attribute(node, "type")
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_default();
    if KNOWN_INPUT_TYPES.contains(&declared.as_str()) {
        declared
    } else {
        "text".to_string()
    }
}

/// Whether the element is rendered and not deliberately hidden
pub fn is_visible<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    let rect = dom.bounding_rect(node);
    let style = dom.computed_style(node);

    let disabled = dom.attribute(node, "disabled").is_some_and(|v| !v.is_empty());
    let is_hidden = style.visibility == "hidden"
        || style.display == "none"
        || dom.attribute(node, "hidden").is_some()
        || disabled;
    // Custom checkboxes and radios are often fully transparent inputs
    // behind a styled label
    let is_transparent = style.opacity == 0.0 && !has_associated_label(dom, node);
    let is_zero_size = rect.is_empty() && style.display != "contents";
    let is_script_or_style = matches!(tag, "script" | "style");

    !is_hidden && !is_transparent && !is_zero_size && !is_script_or_style
}

/// Whether a form control has a `<label>` pointing at it or next to it
pub fn has_associated_label<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    if !LABELABLE_TAGS.contains(&tag) {
        return false;
    }

    if let Some(id) = dom.attribute(node, "id").filter(|id| !id.is_empty()) {
        let document = dom.owner_document(node);
        let has_for = dom
            .elements_by_tag(document, "label")
            .into_iter()
            .any(|label| dom.attribute(label, "for") == Some(id));
        if has_for {
            return true;
        }
    }

    dom.parent_element(node).is_some_and(|parent| {
        dom.element_children(parent)
            .into_iter()
            .any(|sibling| dom.has_tag(sibling, "label"))
    })
}

/// Whether the element can be acted on
pub fn is_interactable<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    // A label wrapping its input defers to the input
    if tag == "label" && !dom.elements_by_tag(node, "input").is_empty() {
        return false;
    }

    INTERACTIVE_TAGS.contains(&tag)
        || (tag == "input" && input_type(dom, node) != "hidden")
        || dom.attribute(node, "role") == Some("button")
}

/// Whether the element accepts typed text
pub fn is_text_insertable<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    match dom.tag_name(node) {
        Some("textarea") => true,
        Some("input") => TEXT_INPUT_TYPES.contains(&input_type(dom, node).as_str()),
        _ => false,
    }
}

/// Whether the element is an empty leaf not worth a tag
pub fn is_textless<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    if TEXTLESS_WHITELIST.contains(&tag) {
        return false;
    }
    if !dom.element_children(node).is_empty() {
        return false;
    }
    if !dom.inner_text(node).trim().is_empty() {
        return false;
    }
    if !dom.elements_by_tag(node, "svg").is_empty() || !dom.elements_by_tag(node, "img").is_empty()
    {
        return false;
    }
    is_within_document(dom, node)
}

/// Whether the element's box lies inside its document's scrollable area
pub fn is_within_document<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    let rect = dom.bounding_rect(node);
    let document = dom.owner_document(node);
    let mut size = dom.scroll_size(document);
    if document == dom.document() {
        let viewport = dom.viewport();
        size.width = size.width.max(viewport.width);
        size.height = size.height.max(viewport.height);
    }

    let larger_than_pixel = rect.width > 1.0 || rect.height > 1.0;
    larger_than_pixel
        && rect.top() >= 0.0
        && rect.left() >= 0.0
        && rect.bottom() <= size.height
        && rect.right() <= size.width
}

/// Text that is more than whitespace or a lone zero-width space
pub fn is_non_whitespace_text(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed != "\u{200B}"
}

/// Text that reads as a word rather than a separator glyph like `|` or `>`
pub fn is_word_like(text: &str) -> bool {
    let trimmed = text.trim();
    WORD_CHAR.is_match(trimmed) || trimmed.chars().count() > 3
}

/// Text node content worth its own tag
pub fn is_taggable_text(text: &str) -> bool {
    is_non_whitespace_text(text) && is_word_like(text)
}

/// True for text nodes whose content is taggable
pub fn is_taggable_text_node<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.text_data(node).is_some_and(is_taggable_text)
}

/// True for text nodes with visible characters
pub fn is_non_whitespace_text_node<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.text_data(node).is_some_and(is_non_whitespace_text)
}

pub fn assign_role<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Role {
    if !is_interactable(dom, node) {
        Role::Text
    } else if is_text_insertable(dom, node) {
        Role::Input
    } else {
        Role::Clickable
    }
}

/// Accessible name recorded as `ariaLabel`
pub fn accessible_name<D: Dom + ?Sized>(
    dom: &D,
    node: NodeId,
    mode: AriaNameMode,
) -> Option<String> {
    let name = match mode {
        AriaNameMode::Attribute => dom.attribute(node, "aria-label").map(str::to_string),
        AriaNameMode::Approximate => Some(approximate_name(dom, node)),
    };
    name.filter(|n| !n.trim().is_empty())
}

fn approximate_name<D: Dom + ?Sized>(dom: &D, node: NodeId) -> String {
    let document = dom.owner_document(node);

    if let Some(ids) = dom.attribute(node, "aria-labelledby") {
        let parts: Vec<String> = ids
            .split_whitespace()
            .filter_map(|id| dom.element_by_id(document, id))
            .map(|label| dom.inner_text(label).trim().to_string())
            .collect();
        return parts.join(" ").trim().to_string();
    }

    if let Some(label) = dom.attribute(node, "aria-label") {
        return label.to_string();
    }

    if let Some(id) = dom.attribute(node, "id").filter(|id| !id.is_empty()) {
        let labels: Vec<String> = dom
            .elements_by_tag(document, "label")
            .into_iter()
            .filter(|label| dom.attribute(*label, "for") == Some(id))
            .map(|label| dom.inner_text(label))
            .collect();
        let joined = labels.join(" ").trim().to_string();
        if !joined.is_empty() {
            return joined;
        }
    }

    if let Some(parent) = dom.parent_element(node)
        && dom.has_tag(parent, "label")
    {
        return dom.inner_text(parent).trim().to_string();
    }

    for attribute in ["alt", "title"] {
        if let Some(value) = dom.attribute(node, attribute) {
            return value.to_string();
        }
    }

    dom.inner_text(node).trim().to_string()
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;
