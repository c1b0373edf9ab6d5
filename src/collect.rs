//! Gathers every element of the page and its accessible iframes.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::{Dom, NodeId};

/// Which document a node came from.
///
/// Empty for the top-level document; otherwise the iframe ordinal at each
/// nesting level, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameContext(Vec<u32>);

impl FrameContext {
    pub fn main() -> Self {
        FrameContext(Vec::new())
    }

    pub fn from_path(path: Vec<u32>) -> Self {
        FrameContext(path)
    }

    pub fn is_main(&self) -> bool {
        self.0.is_empty()
    }

    /// Ordinal of the innermost iframe, `None` for the top-level document
    pub fn index(&self) -> Option<u32> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn path(&self) -> &[u32] {
        &self.0
    }

    /// Context of the `index`-th iframe inside this document
    pub fn child(&self, index: u32) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        FrameContext(path)
    }

    /// `iframe[N]` per nesting level, empty for the top-level document
    pub fn xpath_prefix(&self) -> String {
        self.0.iter().map(|i| format!("iframe[{}]", i)).collect()
    }
}

/// An element together with the document it belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collected {
    pub node: NodeId,
    pub frame: FrameContext,
}

/// Every reachable document, top-level first, up to `max_depth` levels of
/// iframes. Inaccessible frames are skipped.
pub fn all_documents<D: Dom + ?Sized>(dom: &D, max_depth: usize) -> Vec<(NodeId, FrameContext)> {
    let mut out = vec![(dom.document(), FrameContext::main())];
    let mut cursor = 0;
    while cursor < out.len() {
        let (document, frame) = out[cursor].clone();
        cursor += 1;
        if frame.depth() >= max_depth {
            continue;
        }
        for (i, iframe) in dom.elements_by_tag(document, "iframe").into_iter().enumerate() {
            match dom.content_document(iframe) {
                Ok(Some(content)) => out.push((content, frame.child(i as u32))),
                Ok(None) => debug!("iframe {} has no document", i),
                Err(e) => warn!("Error accessing iframe content: {}", e),
            }
        }
    }
    out
}

/// Flat list of candidate elements.
///
/// The top-level document contributes the descendants of `body`; each frame
/// contributes every element of its document. Frames follow the top-level
/// elements, in iframe order.
pub fn collect_all_elements<D: Dom + ?Sized>(dom: &D, max_depth: usize) -> Vec<Collected> {
    let mut out = Vec::new();
    for (document, frame) in all_documents(dom, max_depth) {
        let elements = if frame.is_main() {
            match dom.body(document) {
                Some(body) => dom.descendant_elements(body),
                None => Vec::new(),
            }
        } else {
            dom.descendant_elements(document)
        };
        debug!(
            "Collected {} element(s) from {}",
            elements.len(),
            if frame.is_main() {
                "main document".to_string()
            } else {
                frame.xpath_prefix()
            }
        );
        out.extend(elements.into_iter().map(|node| Collected {
            node,
            frame: frame.clone(),
        }));
    }
    out
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod collect_test;
