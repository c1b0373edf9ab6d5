//! Badge insertion and layout.
//!
//! Every tag is rendered as a small inline `span` next to its element. After
//! insertion, badges that landed far from their anchor are pulled out of the
//! flow and absolutely positioned, then overlapping badges are shrunk until
//! they separate or hit the minimum font size.

use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::classify::{
    accessible_name, assign_role, is_interactable, is_non_whitespace_text_node,
    is_taggable_text_node, is_text_insertable, is_textless, is_visible,
};
use crate::collect::{all_documents, Collected};
use crate::config::TaggingConfig;
use crate::dom::{is_badge, Dom, DomError, NodeId, NodeKind, Rect, BADGE_ID, BADGE_LABEL_ATTRIBUTE};
use crate::types::{Role, TagMetadata};
use crate::xpath::compute_xpath;

/// Wrappers the badge may be pushed into when they are an element's only
/// meaningful child
const DRILL_DOWN_TAGS: &[&str] = &["div", "span", "p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Gap kept between an absolutely positioned badge and its anchor
const ABSOLUTE_OFFSET_PX: f64 = 3.0;

/// Inline style every badge starts with
pub const BADGE_STYLE: &[(&str, &str)] = &[
    ("position", "relative"),
    ("display", "inline"),
    ("color", "white"),
    ("background-color", "red"),
    ("padding", "1.5px"),
    ("border-radius", "3px"),
    ("font-weight", "bold"),
    ("font-family", "Arial"),
    ("margin", "1px"),
    ("line-height", "1.25"),
    ("z-index", "2140000046"),
    ("clip", "auto"),
    ("height", "fit-content"),
    ("width", "fit-content"),
    ("min-height", "15px"),
    ("min-width", "23px"),
    ("max-height", "unset"),
    ("max-width", "unset"),
    ("-webkit-text-fill-color", "white"),
    ("text-decoration", "none"),
    ("letter-spacing", "0px"),
];

/// Text shown inside the badge for `node`
pub fn badge_glyph<D: Dom + ?Sized>(dom: &D, node: NodeId, label: u32) -> String {
    if !is_interactable(dom, node) {
        format!("[{}]", label)
    } else if is_text_insertable(dom, node) {
        format!("[#{}]", label)
    } else if dom.has_tag(node, "a") {
        format!("[@{}]", label)
    } else {
        format!("[${}]", label)
    }
}

/// Detached badge for `node`, created in `node`'s document
pub fn create_badge<D: Dom + ?Sized>(
    dom: &mut D,
    node: NodeId,
    label: u32,
) -> Result<NodeId, DomError> {
    let glyph = badge_glyph(dom, node, label);
    let document = dom.owner_document(node);
    let badge = dom.create_element(document, "span");
    dom.set_attribute(badge, "id", BADGE_ID);
    dom.set_attribute(badge, BADGE_LABEL_ATTRIBUTE, &label.to_string());
    for (property, value) in BADGE_STYLE {
        dom.set_inline_style(badge, property, value);
    }
    let text = dom.create_text(document, &glyph);
    dom.insert_before(badge, text, None)?;
    Ok(badge)
}

/// Strip leading whitespace from `element`'s first child when it is text,
/// so the badge sits inline with the first word
pub fn trim_text_node_start<D: Dom + ?Sized>(dom: &mut D, element: NodeId) {
    let Some(first) = dom.child_nodes(element).first().copied() else {
        return;
    };
    if let Some(text) = dom.text_data(first) {
        let trimmed = text.trim_start().to_string();
        if trimmed.len() != text.len() {
            dom.set_text_data(first, &trimmed);
        }
    }
}

/// Innermost wrapper of `element` that should receive its badge
pub fn insertion_point<D: Dom + ?Sized>(dom: &mut D, element: NodeId) -> NodeId {
    let view: &D = dom;
    let considered: Vec<NodeId> = view
        .child_nodes(element)
        .iter()
        .copied()
        .filter(|child| match view.kind(*child) {
            NodeKind::Text => is_non_whitespace_text_node(view, *child),
            NodeKind::Element => !is_textless(view, *child) && is_visible(view, *child),
            _ => true,
        })
        .collect();

    if let [only] = considered.as_slice()
        && view
            .tag_name(*only)
            .is_some_and(|tag| DRILL_DOWN_TAGS.contains(&tag))
    {
        return insertion_point(dom, *only);
    }

    trim_text_node_start(dom, element);
    element
}

/// Size of the window showing `document`
fn window_size<D: Dom + ?Sized>(dom: &D, document: NodeId) -> (f64, f64) {
    if document == dom.document() {
        let viewport = dom.viewport();
        (viewport.width, viewport.height)
    } else {
        let size = dom.scroll_size(document);
        (size.width, size.height)
    }
}

/// Outcome of [`position_if_misaligned`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The badge rendered next to its anchor
    Inline,
    /// The badge was moved to `body` and absolutely positioned
    Absolute,
    /// The anchor is off-screen horizontally, so the badge was dropped
    Removed,
}

/// Move `badge` out of the flow when it did not render near `reference`.
///
/// A badge is misaligned when it has no size, when its centre is more than
/// `threshold` px away from the anchor's top-left corner on either axis, or
/// when it is not visible.
pub fn position_if_misaligned<D: Dom + ?Sized>(
    dom: &mut D,
    badge: NodeId,
    reference: NodeId,
    threshold: f64,
) -> Result<Placement, DomError> {
    let badge_rect = dom.bounding_rect(badge);
    let anchor = dom.bounding_rect(reference);

    let centre_x = (badge_rect.left() + badge_rect.right()) / 2.0;
    let centre_y = (badge_rect.top() + badge_rect.bottom()) / 2.0;
    let dx = (anchor.left() - centre_x).abs();
    let dy = (anchor.top() - centre_y).abs();
    let misaligned =
        badge_rect.is_empty() || dx > threshold || dy > threshold || !is_visible(dom, badge);
    if !misaligned {
        return Ok(Placement::Inline);
    }

    let document = dom.owner_document(badge);
    let (window_width, window_height) = window_size(dom, document);
    if anchor.right() < 0.0 || anchor.left() > window_width {
        trace!("Dropping badge for off-screen anchor {:?}", reference);
        dom.remove(badge);
        return Ok(Placement::Removed);
    }

    let Some(body) = dom.body(document) else {
        return Ok(Placement::Inline);
    };

    let page_height = window_height.max(dom.scroll_size(document).height);
    let left = (anchor.left() - (badge_rect.width + ABSOLUTE_OFFSET_PX))
        .max(0.0)
        .min(window_width - badge_rect.width);
    let top = (anchor.top() + ABSOLUTE_OFFSET_PX)
        .max(0.0)
        .min(page_height - badge_rect.height);

    dom.set_inline_style(badge, "position", "absolute");
    dom.set_inline_style(badge, "left", &format!("{}px", left));
    dom.set_inline_style(badge, "top", &format!("{}px", top));
    dom.insert_before(body, badge, None)?;
    debug!("Absolutely positioned badge at ({}, {})", left, top);
    Ok(Placement::Absolute)
}

/// Insert one badge per candidate (or per text run) and build the label map.
///
/// Labels are dense and follow candidate order.
pub fn insert_tags<D: Dom + ?Sized>(
    dom: &mut D,
    candidates: &[Collected],
    include_leaf_text: bool,
    config: &TaggingConfig,
) -> Result<BTreeMap<u32, TagMetadata>, DomError> {
    let mut entries = BTreeMap::new();
    let mut label: u32 = 0;

    for candidate in candidates {
        let node = candidate.node;
        let xpath = compute_xpath(dom, node, &candidate.frame);
        let aria_label = accessible_name(dom, node, config.aria_name);

        if is_interactable(dom, node) {
            entries.insert(
                label,
                TagMetadata {
                    xpath,
                    aria_label,
                    text_node_index: None,
                    label: label.to_string(),
                    role: assign_role(dom, node),
                },
            );

            let badge = create_badge(dom, node, label)?;
            match dom.parent_element(node) {
                Some(parent) if is_text_insertable(dom, node) => {
                    dom.insert_before(parent, badge, Some(node))?;
                }
                _ => {
                    let target = insertion_point(dom, node);
                    let first = dom.child_nodes(target).first().copied();
                    dom.insert_before(target, badge, first)?;
                    position_if_misaligned(dom, badge, target, config.misalignment_threshold_px)?;
                }
            }
            label += 1;
        } else if include_leaf_text {
            trim_text_node_start(dom, node);
            let text_children: Vec<NodeId> = dom
                .child_nodes(node)
                .iter()
                .copied()
                .filter(|child| dom.is_text(*child))
                .collect();

            for (position, child) in text_children.iter().enumerate() {
                if !is_taggable_text_node(dom, *child) {
                    continue;
                }
                entries.insert(
                    label,
                    TagMetadata {
                        xpath: xpath.clone(),
                        aria_label: aria_label.clone(),
                        text_node_index: Some(position as u32 + 1),
                        label: label.to_string(),
                        role: Role::Text,
                    },
                );
                let badge = create_badge(dom, node, label)?;
                dom.insert_before(node, badge, Some(*child))?;
                label += 1;
            }
        }
    }

    debug!("Inserted {} tag(s)", entries.len());
    Ok(entries)
}

/// Every badge currently attached, grouped by document
pub fn badges_by_document<D: Dom + ?Sized>(dom: &D, max_depth: usize) -> Vec<Vec<NodeId>> {
    all_documents(dom, max_depth)
        .into_iter()
        .map(|(document, _)| {
            dom.descendant_elements(document)
                .into_iter()
                .filter(|el| is_badge(dom, *el))
                .collect()
        })
        .collect()
}

fn font_size<D: Dom + ?Sized>(dom: &D, badge: NodeId) -> f64 {
    dom.computed_style(badge).font_size
}

fn set_font_size<D: Dom + ?Sized>(dom: &mut D, badge: NodeId, px: f64) {
    dom.set_inline_style(badge, "font-size", &format!("{}px", px));
}

/// Shrink overlapping badges in `font_step_px` steps.
///
/// Each pair is shrunk until it separates or both badges sit at
/// `min_font_size_px`; a badge already at the floor stays there while its
/// partner keeps shrinking.
pub fn shrink_colliding_badges<D: Dom + ?Sized>(dom: &mut D, config: &TaggingConfig) {
    let floor = config.min_font_size_px;
    let step = config.font_step_px;
    let mut adjusted = 0usize;

    for badges in badges_by_document(dom, config.max_frame_depth) {
        for (i, first) in badges.iter().enumerate() {
            for second in &badges[i + 1..] {
                let mut a = dom.bounding_rect(*first);
                let mut b = dom.bounding_rect(*second);
                let mut font_a = font_size(dom, *first);
                let mut font_b = font_size(dom, *second);
                if collides(&a, &b) && (font_a > floor || font_b > floor) {
                    adjusted += 1;
                }

                while collides(&a, &b) && (font_a > floor || font_b > floor) {
                    if font_a > floor {
                        font_a = (font_a - step).max(floor);
                        set_font_size(dom, *first, font_a);
                    }
                    if font_b > floor {
                        font_b = (font_b - step).max(floor);
                        set_font_size(dom, *second, font_b);
                    }
                    a = dom.bounding_rect(*first);
                    b = dom.bounding_rect(*second);
                }
            }
        }
    }

    if adjusted > 0 {
        debug!("Shrunk {} colliding badge pair(s)", adjusted);
    }
}

fn collides(a: &Rect, b: &Rect) -> bool {
    !a.is_empty() && !b.is_empty() && a.overlaps(b)
}

/// Raise any badge rendering below `min_font_size_px`
pub fn enforce_minimum_font_size<D: Dom + ?Sized>(dom: &mut D, config: &TaggingConfig) {
    for badges in badges_by_document(dom, config.max_frame_depth) {
        for badge in badges {
            if font_size(dom, badge) < config.min_font_size_px {
                set_font_size(dom, badge, config.min_font_size_px);
            }
        }
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
