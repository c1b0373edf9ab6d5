//! DOM abstraction the tagging engine runs against.
//!
//! Classification, collection and XPath synthesis only read through [`Dom`];
//! badge insertion and style overrides go through its mutation half. The
//! crate ships one implementation, [`MemoryDom`], which also backs live pages
//! once they have been captured as a [`crate::snapshot::PageSnapshot`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

pub use memory::{ElementSpec, MemoryDom};

/// Element id carried by every badge the engine inserts
pub const BADGE_ID: &str = "__webtag_id";

/// Attribute holding the badge's label
pub const BADGE_LABEL_ATTRIBUTE: &str = "data-webtag-id";

/// Opaque handle to a node inside one [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

/// Coarse node type, mirroring `Node.nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    /// Comments, fragments and anything else without a tag
    Other,
}

/// Width/height pair used for the viewport and document scroll size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Extent { width, height }
    }
}

/// Bounding box in CSS pixels, as returned by `getBoundingClientRect()`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Strict overlap test; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The subset of `getComputedStyle()` the engine looks at
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
    pub font_size: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
            font_size: 16.0,
        }
    }
}

/// Failures surfaced by a [`Dom`] implementation
#[derive(Debug, Error)]
pub enum DomError {
    #[error("frame content is not accessible: {0}")]
    CrossOrigin(String),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0:?} is not a child of {1:?}")]
    NotAChild(NodeId, NodeId),
}

/// A live, mutable document tree with layout information.
///
/// Handles are only valid for the `Dom` that produced them.
pub trait Dom {
    /// The top-level document node
    fn document(&self) -> NodeId;

    fn kind(&self, node: NodeId) -> NodeKind;

    /// `parentNode`
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// `childNodes`, including text and comment nodes
    fn child_nodes(&self, node: NodeId) -> &[NodeId];

    /// Document node owning `node` (a document owns itself)
    fn owner_document(&self, node: NodeId) -> NodeId;

    /// Lower-case tag name for elements
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Character data of a text node
    fn text_data(&self, node: NodeId) -> Option<&str>;

    /// Content document of an `<iframe>`.
    ///
    /// `Ok(None)` when the frame has no document yet, `Err` when the frame
    /// cannot be accessed from this context.
    fn content_document(&self, iframe: NodeId) -> Result<Option<NodeId>, DomError>;

    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// True for elements matched by the map-widget selectors when the page
    /// was read
    fn is_map_widget(&self, node: NodeId) -> bool;

    /// Size of the top-level window
    fn viewport(&self) -> Extent;

    /// Scrollable size of a document
    fn scroll_size(&self, document: NodeId) -> Extent;

    fn create_element(&mut self, document: NodeId, tag: &str) -> NodeId;

    fn create_text(&mut self, document: NodeId, data: &str) -> NodeId;

    /// Insert `child` under `parent` before `reference`, or append when
    /// `reference` is `None`. A `child` that is already attached is moved.
    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError>;

    /// Detach `node` from its parent; a no-op for detached nodes
    fn remove(&mut self, node: NodeId);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn set_text_data(&mut self, node: NodeId, data: &str);

    /// Value of an inline style property (`element.style[prop]`)
    fn inline_style(&self, node: NodeId, property: &str) -> Option<&str>;

    fn set_inline_style(&mut self, node: NodeId, property: &str, value: &str);

    fn remove_inline_style(&mut self, node: NodeId, property: &str);

    fn is_element(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Element
    }

    fn is_text(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Text
    }

    /// True when `node` is an element whose tag is `tag`
    fn has_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node) == Some(tag)
    }

    /// Element children only (`element.children`)
    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.child_nodes(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Element ancestor (`parentElement`)
    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|parent| self.is_element(*parent))
    }

    /// All descendant elements in document order (`querySelectorAll("*")`)
    fn descendant_elements(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_nodes(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
            }
            stack.extend(self.child_nodes(node).iter().rev().copied());
        }
        out
    }

    /// Descendant elements carrying `tag` (`getElementsByTagName`)
    fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendant_elements(root)
            .into_iter()
            .filter(|el| self.has_tag(*el, tag))
            .collect()
    }

    /// `document.body`
    fn body(&self, document: NodeId) -> Option<NodeId> {
        self.descendant_elements(document)
            .into_iter()
            .find(|el| self.has_tag(*el, "body"))
    }

    /// `document.getElementById`
    fn element_by_id(&self, document: NodeId, id: &str) -> Option<NodeId> {
        self.descendant_elements(document)
            .into_iter()
            .find(|el| self.attribute(*el, "id") == Some(id))
    }

    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Rendered text of an element, skipping `script`/`style` and
    /// `display: none` subtrees
    fn inner_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.child_nodes(node) {
            match self.kind(*child) {
                NodeKind::Text => out.push_str(self.text_data(*child).unwrap_or_default()),
                NodeKind::Element => {
                    let skip = matches!(self.tag_name(*child), Some("script" | "style"))
                        || self.computed_style(*child).display == "none";
                    if !skip {
                        out.push_str(&self.inner_text(*child));
                    }
                }
                _ => {}
            }
        }
        out
    }
}

/// True when `node` is a badge inserted by the engine
pub fn is_badge<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.is_element(node) && dom.attribute(node, "id") == Some(BADGE_ID)
}

/// Parse a CSS pixel length such as `"12.5px"`
pub fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse::<f64>().ok()
}

#[cfg(test)]
pub(crate) mod fixture;
