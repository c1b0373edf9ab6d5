//! Tagging passes over a page.
//!
//! [`PageTagger`] bundles the operations a driver invokes between actions:
//! a full tagging pass, tag removal, and the hide/revert pair used when only
//! the badges should stay on screen.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::collect::{all_documents, collect_all_elements};
use crate::config::TaggingConfig;
use crate::dom::{is_badge, Dom, NodeId};
use crate::layout::{badges_by_document, enforce_minimum_font_size, insert_tags, shrink_colliding_badges};
use crate::select::{reduce_nesting, select_candidates};
use crate::types::Inventory;

/// Holds the inline opacity a map widget had before it was suppressed
pub const ORIGINAL_OPACITY_ATTRIBUTE: &str = "data-webtag-original-opacity";

/// Holds the inline visibility an element had before `hide_non_tag_elements`
pub const ORIGINAL_VISIBILITY_ATTRIBUTE: &str = "data-webtag-original-visibility";

/// Runs tagging passes against one page.
///
/// The tagger borrows the page mutably for its whole lifetime, so passes
/// over the same page cannot interleave.
pub struct PageTagger<'a, D: Dom + ?Sized> {
    dom: &'a mut D,
    config: &'a TaggingConfig,
}

impl<'a, D: Dom + ?Sized> PageTagger<'a, D> {
    pub fn new(dom: &'a mut D, config: &'a TaggingConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid tagging configuration")?;
        Ok(PageTagger { dom, config })
    }

    pub fn dom(&self) -> &D {
        self.dom
    }

    /// Full pass: clear previous tags, suppress map widgets, then collect,
    /// select, reduce, insert and lay out badges.
    pub fn tag_page(&mut self, include_leaf_text: bool) -> Result<Inventory> {
        self.remove_tags();
        let suppressed = self.hide_map_elements();

        let dom: &D = self.dom;
        let elements: Vec<_> = collect_all_elements(dom, self.config.max_frame_depth)
            .into_iter()
            .filter(|el| {
                !suppressed
                    .iter()
                    .any(|map| el.node == *map || dom.is_descendant_of(el.node, *map))
            })
            .collect();
        let selected = select_candidates(dom, elements, include_leaf_text);
        let candidates = reduce_nesting(dom, selected, self.config.nesting_absorb_limit);

        let entries = insert_tags(self.dom, &candidates, include_leaf_text, self.config)
            .context("Failed to insert tags")?;
        shrink_colliding_badges(self.dom, self.config);
        enforce_minimum_font_size(self.dom, self.config);

        info!(
            "Tagged {} target(s) from {} candidate element(s)",
            entries.len(),
            candidates.len()
        );
        Ok(Inventory::from_map(entries))
    }

    /// Remove every badge and restore suppressed map widgets
    pub fn remove_tags(&mut self) {
        let mut removed = 0;
        for badges in badges_by_document(self.dom, self.config.max_frame_depth) {
            for badge in badges {
                self.dom.remove(badge);
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Removed {} badge(s)", removed);
        }
        self.show_map_elements();
    }

    /// Force map widgets to `opacity: 0`, returning them
    pub fn hide_map_elements(&mut self) -> Vec<NodeId> {
        let matched = self.map_elements();
        for element in &matched {
            if self.dom.attribute(*element, ORIGINAL_OPACITY_ATTRIBUTE).is_none() {
                let previous = self
                    .dom
                    .inline_style(*element, "opacity")
                    .unwrap_or_default()
                    .to_string();
                self.dom
                    .set_attribute(*element, ORIGINAL_OPACITY_ATTRIBUTE, &previous);
            }
            self.dom.set_inline_style(*element, "opacity", "0");
        }
        if !matched.is_empty() {
            debug!("Suppressed {} map widget(s)", matched.len());
        }
        matched
    }

    /// Undo [`PageTagger::hide_map_elements`]
    pub fn show_map_elements(&mut self) {
        let stashed = self.elements_with_attribute(ORIGINAL_OPACITY_ATTRIBUTE);
        for element in stashed {
            restore_inline(self.dom, element, "opacity", ORIGINAL_OPACITY_ATTRIBUTE);
        }
    }

    /// Hide everything except badges, remembering prior inline visibility
    pub fn hide_non_tag_elements(&mut self) {
        let elements = collect_all_elements(self.dom, self.config.max_frame_depth);
        for element in elements.iter().map(|c| c.node) {
            if self
                .dom
                .attribute(element, ORIGINAL_VISIBILITY_ATTRIBUTE)
                .is_none()
            {
                let previous = self
                    .dom
                    .inline_style(element, "visibility")
                    .unwrap_or_default()
                    .to_string();
                self.dom
                    .set_attribute(element, ORIGINAL_VISIBILITY_ATTRIBUTE, &previous);
            }
            let value = if is_badge(self.dom, element) {
                "visible"
            } else {
                "hidden"
            };
            self.dom.set_inline_style(element, "visibility", value);
        }
        debug!("Hid {} element(s)", elements.len());
    }

    /// Undo [`PageTagger::hide_non_tag_elements`]
    pub fn revert_visibilities(&mut self) {
        let stashed = self.elements_with_attribute(ORIGINAL_VISIBILITY_ATTRIBUTE);
        for element in stashed {
            restore_inline(
                self.dom,
                element,
                "visibility",
                ORIGINAL_VISIBILITY_ATTRIBUTE,
            );
        }
    }

    fn map_elements(&self) -> Vec<NodeId> {
        let dom: &D = self.dom;
        let mut out = Vec::new();
        for (document, _) in all_documents(dom, self.config.max_frame_depth) {
            out.extend(
                dom.descendant_elements(document)
                    .into_iter()
                    .filter(|el| dom.is_map_widget(*el)),
            );
        }
        out
    }

    fn elements_with_attribute(&self, attribute: &str) -> Vec<NodeId> {
        let dom: &D = self.dom;
        all_documents(dom, self.config.max_frame_depth)
            .into_iter()
            .flat_map(|(document, _)| dom.descendant_elements(document))
            .filter(|el| dom.attribute(*el, attribute).is_some())
            .collect()
    }
}

/// Put back the inline `property` stashed in `attribute`, dropping the
/// override when there was none
fn restore_inline<D: Dom + ?Sized>(dom: &mut D, element: NodeId, property: &str, attribute: &str) {
    let previous = dom.attribute(element, attribute).unwrap_or_default().to_string();
    if previous.is_empty() {
        dom.remove_inline_style(element, property);
    } else {
        dom.set_inline_style(element, property, &previous);
    }
    dom.remove_attribute(element, attribute);
}

#[cfg(test)]
#[path = "tagger_test.rs"]
mod tagger_test;
