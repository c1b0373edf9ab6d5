//! Candidate selection and nested-tag reduction.

use std::collections::HashSet;
use tracing::debug;

use crate::classify::{is_interactable, is_taggable_text_node, is_textless, is_visible};
use crate::collect::Collected;
use crate::dom::{Dom, NodeId};

/// Whether the element has at least one direct text child worth tagging
pub fn has_taggable_text<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.child_nodes(node)
        .iter()
        .any(|child| is_taggable_text_node(dom, *child))
}

/// Filter collected elements down to the ones that get a tag.
///
/// Interactable elements are always kept; other elements are kept only for
/// their leaf text, and only when `include_leaf_text` is set. Collection
/// order is preserved since it decides label numbering.
pub fn select_candidates<D: Dom + ?Sized>(
    dom: &D,
    elements: Vec<Collected>,
    include_leaf_text: bool,
) -> Vec<Collected> {
    let total = elements.len();
    let selected: Vec<Collected> = elements
        .into_iter()
        .filter(|el| {
            if is_textless(dom, el.node) || !is_visible(dom, el.node) {
                return false;
            }
            if is_interactable(dom, el.node) {
                return true;
            }
            include_leaf_text && has_taggable_text(dom, el.node)
        })
        .collect();
    debug!("Selected {} of {} element(s)", selected.len(), total);
    selected
}

/// Drop tags nested inside interactable candidates.
///
/// An interactable element absorbs up to `absorb_limit` descendant
/// candidates (usually its own label text or icon). With more than that it
/// is treated as a container and its descendants keep their tags.
pub fn reduce_nesting<D: Dom + ?Sized>(
    dom: &D,
    candidates: Vec<Collected>,
    absorb_limit: usize,
) -> Vec<Collected> {
    let candidate_nodes: HashSet<NodeId> = candidates.iter().map(|c| c.node).collect();
    let mut removed: HashSet<NodeId> = HashSet::new();

    for candidate in &candidates {
        if !is_interactable(dom, candidate.node) {
            continue;
        }
        // Already-removed descendants are not counted again
        let nested: Vec<NodeId> = dom
            .descendant_elements(candidate.node)
            .into_iter()
            .filter(|child| candidate_nodes.contains(child) && !removed.contains(child))
            .collect();
        if nested.len() <= absorb_limit {
            removed.extend(nested);
        }
    }

    if !removed.is_empty() {
        debug!("Removed {} nested tag(s)", removed.len());
    }
    candidates
        .into_iter()
        .filter(|c| !removed.contains(&c.node))
        .collect()
}

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;
