//! Arena-backed [`Dom`] with a small layout model.
//!
//! Element and text-run rectangles are supplied by whoever builds the tree
//! (tests, or a captured page snapshot). Badges are the only nodes laid out
//! here. An inline badge takes the place of the node it precedes, stacked
//! left to right with any badges directly before it; without a rendered
//! next sibling it sits at the top-left of its parent. Absolutely positioned
//! badges sit at their `left`/`top` coordinates. Badge size follows the font
//! size.

use super::{
    is_badge, parse_px, ComputedStyle, Dom, DomError, Extent, NodeId, NodeKind, Rect, BADGE_ID,
};

/// Average glyph advance relative to the font size
const GLYPH_WIDTH_RATIO: f64 = 0.6;
/// Padding plus margin on each side of a badge
const BADGE_HORIZONTAL_CHROME: f64 = 5.0;
const BADGE_LINE_HEIGHT: f64 = 1.25;
const BADGE_VERTICAL_CHROME: f64 = 3.0;
const BADGE_MIN_WIDTH: f64 = 23.0;
const BADGE_MIN_HEIGHT: f64 = 15.0;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    document: NodeId,
    data: NodeData,
}

#[derive(Debug, Clone)]
enum NodeData {
    Document { scroll_size: Extent },
    Element(Element),
    Text { data: String, rect: Rect },
    Other,
}

#[derive(Debug, Clone)]
enum FrameContent {
    Document(NodeId),
    Blocked(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    inline: Vec<(String, String)>,
    display: Option<String>,
    visibility: Option<String>,
    opacity: Option<f64>,
    font_size: Option<f64>,
    rect: Rect,
    map_widget: bool,
    frame: Option<FrameContent>,
}

/// Description of an element to append to a [`MemoryDom`]
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, String)>,
    rect: Rect,
    display: Option<String>,
    visibility: Option<String>,
    opacity: Option<f64>,
    font_size: Option<f64>,
    map_widget: bool,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        ElementSpec {
            tag: tag.to_lowercase(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn display(mut self, value: &str) -> Self {
        self.display = Some(value.to_string());
        self
    }

    pub fn visibility(mut self, value: &str) -> Self {
        self.visibility = Some(value.to_string());
        self
    }

    pub fn opacity(mut self, value: f64) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn font_size(mut self, px: f64) -> Self {
        self.font_size = Some(px);
        self
    }

    /// Mark the element as a map widget
    pub fn map_widget(mut self) -> Self {
        self.map_widget = true;
        self
    }
}

/// In-memory document tree, including any number of frame documents
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    main: NodeId,
    viewport: Extent,
}

impl MemoryDom {
    /// Empty top-level document whose scroll size equals the viewport
    pub fn new(viewport: Extent) -> Self {
        let main = NodeId(0);
        MemoryDom {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                document: main,
                data: NodeData::Document {
                    scroll_size: viewport,
                },
            }],
            main,
            viewport,
        }
    }

    /// Top-level document pre-populated with `html`, `head` and a `body`
    /// spanning the viewport
    pub fn html_page(viewport: Extent) -> Self {
        let mut dom = MemoryDom::new(viewport);
        let main = dom.main;
        dom.populate_skeleton(main, viewport);
        dom
    }

    /// Add a detached document, e.g. the content of an iframe
    pub fn new_document(&mut self, scroll_size: Extent) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            document: id,
            data: NodeData::Document { scroll_size },
        });
        id
    }

    /// Add a frame document with its own `html`/`head`/`body` skeleton
    pub fn new_html_document(&mut self, size: Extent) -> NodeId {
        let document = self.new_document(size);
        self.populate_skeleton(document, size);
        document
    }

    fn populate_skeleton(&mut self, document: NodeId, size: Extent) {
        let full = Rect::new(0.0, 0.0, size.width, size.height);
        let html = self.append_element(document, ElementSpec::new("html").with_rect(full));
        self.append_element(html, ElementSpec::new("head").display("none"));
        self.append_element(html, ElementSpec::new("body").with_rect(full));
    }

    pub fn append_element(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let element = Element {
            tag: spec.tag,
            attributes: spec.attributes,
            inline: Vec::new(),
            display: spec.display,
            visibility: spec.visibility,
            opacity: spec.opacity,
            font_size: spec.font_size,
            rect: spec.rect,
            map_widget: spec.map_widget,
            frame: None,
        };
        self.append_node(parent, NodeData::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append_text_with_rect(parent, text, Rect::default())
    }

    /// Append a text run whose rendered box is known
    pub fn append_text_with_rect(&mut self, parent: NodeId, text: &str, rect: Rect) -> NodeId {
        self.append_node(
            parent,
            NodeData::Text {
                data: text.to_string(),
                rect,
            },
        )
    }

    pub fn append_comment(&mut self, parent: NodeId) -> NodeId {
        self.append_node(parent, NodeData::Other)
    }

    fn append_node(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        let document = self.nodes[parent.0].document;
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            document,
            data,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Make `document` the accessible content of `iframe`
    pub fn attach_frame(&mut self, iframe: NodeId, document: NodeId) {
        if let Some(el) = self.element_mut(iframe) {
            el.frame = Some(FrameContent::Document(document));
        }
    }

    /// Mark `iframe` as inaccessible (e.g. cross-origin)
    pub fn block_frame(&mut self, iframe: NodeId, reason: &str) {
        if let Some(el) = self.element_mut(iframe) {
            el.frame = Some(FrameContent::Blocked(reason.to_string()));
        }
    }

    pub fn set_scroll_size(&mut self, document: NodeId, size: Extent) {
        if let NodeData::Document { scroll_size } = &mut self.nodes[document.0].data {
            *scroll_size = size;
        }
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Rendered box of an element or text run, used to anchor badges
    fn anchor_rect(&self, node: NodeId) -> Rect {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Text { rect, .. }) if self.displayed(node) => *rect,
            Some(NodeData::Element(_)) => self.bounding_rect(node),
            _ => Rect::default(),
        }
    }

    fn displayed(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.is_element(current) && self.computed_style(current).display == "none" {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }

    fn badge_rect(&self, node: NodeId) -> Rect {
        let style = self.computed_style(node);
        let chars = self
            .child_nodes(node)
            .iter()
            .filter_map(|child| self.text_data(*child))
            .map(|text| text.chars().count())
            .sum::<usize>();
        let width = (chars as f64 * style.font_size * GLYPH_WIDTH_RATIO
            + BADGE_HORIZONTAL_CHROME)
            .max(BADGE_MIN_WIDTH);
        let height =
            (style.font_size * BADGE_LINE_HEIGHT + BADGE_VERTICAL_CHROME).max(BADGE_MIN_HEIGHT);

        if self.inline_style(node, "position") == Some("absolute") {
            let left = self.inline_style(node, "left").and_then(parse_px).unwrap_or(0.0);
            let top = self.inline_style(node, "top").and_then(parse_px).unwrap_or(0.0);
            return Rect::new(left, top, width, height);
        }

        let Some(parent) = self.parent_element(node) else {
            return Rect::default();
        };
        let siblings = self.child_nodes(parent);
        let Some(position) = siblings.iter().position(|sibling| *sibling == node) else {
            return Rect::default();
        };
        let anchor = siblings[position + 1..]
            .iter()
            .find(|sibling| !is_badge(self, **sibling))
            .map(|sibling| self.anchor_rect(*sibling))
            .filter(|rect| !rect.is_empty())
            .unwrap_or_else(|| self.bounding_rect(parent));
        if anchor.is_empty() {
            return Rect::default();
        }

        let offset: f64 = siblings[..position]
            .iter()
            .rev()
            .take_while(|sibling| is_badge(self, **sibling))
            .filter(|sibling| self.inline_style(**sibling, "position") != Some("absolute"))
            .map(|sibling| self.bounding_rect(*sibling).width)
            .sum();
        Rect::new(anchor.x + offset, anchor.y, width, height)
    }

    fn adopt(&mut self, node: NodeId, document: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            self.nodes[current.0].document = document;
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
    }
}

impl Dom for MemoryDom {
    fn document(&self) -> NodeId {
        self.main
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Document { .. }) => NodeKind::Document,
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Text { .. }) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn child_nodes(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    fn owner_document(&self, node: NodeId) -> NodeId {
        self.nodes
            .get(node.0)
            .map(|n| n.document)
            .unwrap_or(self.main)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn text_data(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text { data, .. } => Some(data.as_str()),
            _ => None,
        }
    }

    fn content_document(&self, iframe: NodeId) -> Result<Option<NodeId>, DomError> {
        match self.element(iframe).and_then(|el| el.frame.as_ref()) {
            Some(FrameContent::Document(document)) => Ok(Some(*document)),
            Some(FrameContent::Blocked(reason)) => Err(DomError::CrossOrigin(reason.clone())),
            None => Ok(None),
        }
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        let Some(el) = self.element(node) else {
            return ComputedStyle::default();
        };
        let inherited = self
            .parent_element(node)
            .map(|parent| self.computed_style(parent))
            .unwrap_or_default();
        let inline = |property: &str| self.inline_style(node, property);

        ComputedStyle {
            display: inline("display")
                .map(str::to_string)
                .or_else(|| el.display.clone())
                .unwrap_or_else(|| "block".to_string()),
            visibility: inline("visibility")
                .map(str::to_string)
                .or_else(|| el.visibility.clone())
                .unwrap_or(inherited.visibility),
            opacity: inline("opacity")
                .and_then(|value| value.trim().parse::<f64>().ok())
                .or(el.opacity)
                .unwrap_or(1.0),
            font_size: inline("font-size")
                .and_then(parse_px)
                .or(el.font_size)
                .unwrap_or(inherited.font_size),
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let Some(el) = self.element(node) else {
            return Rect::default();
        };
        if !self.displayed(node) || self.computed_style(node).display == "contents" {
            return Rect::default();
        }
        if self.attribute(node, "id") == Some(BADGE_ID) {
            return self.badge_rect(node);
        }
        el.rect
    }

    fn is_map_widget(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.map_widget)
    }

    fn viewport(&self) -> Extent {
        self.viewport
    }

    fn scroll_size(&self, document: NodeId) -> Extent {
        match self.nodes.get(document.0).map(|n| &n.data) {
            Some(NodeData::Document { scroll_size }) => *scroll_size,
            _ => self.viewport,
        }
    }

    fn create_element(&mut self, document: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            document,
            data: NodeData::Element(Element {
                tag: tag.to_lowercase(),
                attributes: Vec::new(),
                inline: Vec::new(),
                display: None,
                visibility: None,
                opacity: None,
                font_size: None,
                rect: Rect::default(),
                map_widget: false,
                frame: None,
            }),
        });
        id
    }

    fn create_text(&mut self, document: NodeId, data: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            document,
            data: NodeData::Text {
                data: data.to_string(),
                rect: Rect::default(),
            },
        });
        id
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if !matches!(self.kind(parent), NodeKind::Element | NodeKind::Document) {
            return Err(DomError::NotAnElement(parent));
        }
        if let Some(reference) = reference
            && self.parent(reference) != Some(parent)
        {
            return Err(DomError::NotAChild(reference, parent));
        }

        self.remove(child);
        let position = match reference {
            Some(reference) => self.nodes[parent.0]
                .children
                .iter()
                .position(|c| *c == reference)
                .ok_or(DomError::NotAChild(reference, parent))?,
            None => self.nodes[parent.0].children.len(),
        };
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        let document = self.nodes[parent.0].document;
        self.adopt(child, document);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) {
            self.nodes[parent.0].children.retain(|c| *c != node);
            self.nodes[node.0].parent = None;
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            match el.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => el.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.retain(|(key, _)| key != name);
        }
    }

    fn set_text_data(&mut self, node: NodeId, data: &str) {
        if let Some(NodeData::Text { data: text, .. }) =
            self.nodes.get_mut(node.0).map(|n| &mut n.data)
        {
            *text = data.to_string();
        }
    }

    fn inline_style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .inline
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    fn set_inline_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            match el.inline.iter_mut().find(|(key, _)| key == property) {
                Some((_, existing)) => *existing = value.to_string(),
                None => el.inline.push((property.to_string(), value.to_string())),
            }
        }
    }

    fn remove_inline_style(&mut self, node: NodeId, property: &str) {
        if let Some(el) = self.element_mut(node) {
            el.inline.retain(|(key, _)| key != property);
        }
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
