//! Bridge between a live browser page and [`MemoryDom`].
//!
//! A tagging pass against a real page runs in three steps: [`CAPTURE_SCRIPT`]
//! serialises the page (main document plus reachable iframes) into a
//! [`PageSnapshot`], the engine tags the [`MemoryDom`] built from it, and the
//! resulting [`BadgePlan`] is painted back onto the page with
//! [`PAINT_SCRIPT`]. The remaining scripts are the live-page versions of the
//! cleanup hooks. Marker ids and attribute names reach every script through
//! [`badge_template`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

use crate::collect::{all_documents, FrameContext};
use crate::dom::{
    is_badge, Dom, ElementSpec, Extent, MemoryDom, NodeId, NodeKind, Rect, BADGE_ID,
    BADGE_LABEL_ATTRIBUTE,
};
use crate::config::TaggingConfig;
use crate::layout::BADGE_STYLE;
use crate::page::{focused_label, PageInfo, PageMetadata, VisualViewport};
use crate::tagger::{PageTagger, ORIGINAL_OPACITY_ATTRIBUTE, ORIGINAL_VISIBILITY_ATTRIBUTE};
use crate::types::Inventory;
use crate::xpath::compute_xpath;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed page snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Malformed page snapshot: no documents")]
    NoDocuments,

    #[error("Malformed page snapshot: node {0} does not exist")]
    DanglingNode(usize),

    #[error("Malformed page snapshot: node {0} is not a document")]
    NotADocument(usize),

    #[error("Malformed page snapshot: node {0} appears more than once")]
    DuplicateNode(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Document,
    Element,
    Text,
    Other,
}

/// What an `<iframe>` showed at capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSnapshot {
    /// Id of the captured content document
    Document(usize),
    /// The frame could not be read, with the reason
    Blocked(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: usize,
    pub kind: SnapshotKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Inline style properties set on the element itself
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inline: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameSnapshot>,
    /// Matched the map-widget selectors at capture time
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub map: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Id of the document node
    pub id: usize,
    pub scroll_size: Extent,
}

/// Serialised page: the top-level document comes first in `documents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    pub viewport: Extent,
    pub documents: Vec<DocumentSnapshot>,
    pub nodes: Vec<NodeSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_viewport: Option<VisualViewport>,
    #[serde(default, skip_serializing_if = "PageMetadata::is_empty")]
    pub metadata: PageMetadata,
    /// Id of the node holding keyboard focus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused: Option<usize>,
}

impl PageSnapshot {
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the in-memory page
    pub fn into_dom(self) -> Result<MemoryDom, SnapshotError> {
        self.build().map(|(dom, _)| dom)
    }

    /// Build the in-memory page along with the snapshot id of every node
    fn build(&self) -> Result<(MemoryDom, HashMap<usize, NodeId>), SnapshotError> {
        if self.documents.is_empty() {
            return Err(SnapshotError::NoDocuments);
        }
        let nodes: HashMap<usize, &NodeSnapshot> = self.nodes.iter().map(|n| (n.id, n)).collect();

        let mut dom = MemoryDom::new(self.viewport);
        let mut ids: HashMap<usize, NodeId> = HashMap::new();
        let mut frames: Vec<(NodeId, FrameSnapshot)> = Vec::new();

        for (i, document) in self.documents.iter().enumerate() {
            let snapshot = nodes
                .get(&document.id)
                .ok_or(SnapshotError::DanglingNode(document.id))?;
            if snapshot.kind != SnapshotKind::Document {
                return Err(SnapshotError::NotADocument(document.id));
            }
            let root = if i == 0 {
                dom.set_scroll_size(dom.document(), document.scroll_size);
                dom.document()
            } else {
                dom.new_document(document.scroll_size)
            };
            if ids.insert(document.id, root).is_some() {
                return Err(SnapshotError::DuplicateNode(document.id));
            }

            let mut stack: Vec<(NodeId, usize)> = snapshot
                .children
                .iter()
                .rev()
                .map(|child| (root, *child))
                .collect();
            while let Some((parent, id)) = stack.pop() {
                let node = nodes.get(&id).ok_or(SnapshotError::DanglingNode(id))?;
                let created = match node.kind {
                    SnapshotKind::Element => {
                        let created = dom.append_element(parent, element_spec(node));
                        for (property, value) in &node.inline {
                            dom.set_inline_style(created, property, value);
                        }
                        if let Some(frame) = &node.frame {
                            frames.push((created, frame.clone()));
                        }
                        created
                    }
                    SnapshotKind::Text => dom.append_text_with_rect(
                        parent,
                        node.text.as_deref().unwrap_or_default(),
                        node.rect.unwrap_or_default(),
                    ),
                    SnapshotKind::Other => dom.append_comment(parent),
                    SnapshotKind::Document => return Err(SnapshotError::DuplicateNode(id)),
                };
                if ids.insert(id, created).is_some() {
                    return Err(SnapshotError::DuplicateNode(id));
                }
                stack.extend(node.children.iter().rev().map(|child| (created, *child)));
            }
        }

        for (iframe, frame) in frames {
            match frame {
                FrameSnapshot::Document(id) => {
                    let document = *ids.get(&id).ok_or(SnapshotError::DanglingNode(id))?;
                    if dom.kind(document) != NodeKind::Document {
                        return Err(SnapshotError::NotADocument(id));
                    }
                    dom.attach_frame(iframe, document);
                }
                FrameSnapshot::Blocked(reason) => dom.block_frame(iframe, &reason),
            }
        }

        debug!(
            "Loaded snapshot with {} node(s) in {} document(s){}",
            ids.len(),
            self.documents.len(),
            self.url
                .as_ref()
                .map(|url| format!(" from {}", url))
                .unwrap_or_default()
        );
        Ok((dom, ids))
    }
}

fn element_spec(node: &NodeSnapshot) -> ElementSpec {
    let mut spec = ElementSpec::new(node.tag.as_deref().unwrap_or("unknown"))
        .with_rect(node.rect.unwrap_or_default());
    for (name, value) in &node.attributes {
        spec = spec.attr(name, value);
    }
    if let Some(display) = &node.display {
        spec = spec.display(display);
    }
    if let Some(visibility) = &node.visibility {
        spec = spec.visibility(visibility);
    }
    if let Some(opacity) = node.opacity {
        spec = spec.opacity(opacity);
    }
    if let Some(font_size) = node.font_size {
        spec = spec.font_size(font_size);
    }
    if node.map {
        spec = spec.map_widget();
    }
    spec
}

/// Absolute badge coordinates within the badge's document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BadgePosition {
    pub left: f64,
    pub top: f64,
}

/// Where and how to paint one badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgePlacement {
    /// Iframe ordinals leading to the badge's document
    pub frame: Vec<u32>,
    /// Path of the badge's parent inside that document
    pub parent_xpath: String,
    /// Position among the parent's child nodes, badges excluded
    pub index: usize,
    pub glyph: String,
    pub label: String,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BadgePosition>,
}

/// An element to suppress with `opacity: 0` while tags are shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressedElement {
    pub frame: Vec<u32>,
    pub xpath: String,
}

/// Everything the paint script needs to mirror a tagged [`MemoryDom`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadgePlan {
    pub badges: Vec<BadgePlacement>,
    pub suppressed: Vec<SuppressedElement>,
}

impl BadgePlan {
    /// Read the badges and suppressed map widgets out of a tagged page
    pub fn from_dom<D: Dom + ?Sized>(dom: &D, max_depth: usize) -> Self {
        let mut plan = BadgePlan::default();
        for (document, frame) in all_documents(dom, max_depth) {
            for element in dom.descendant_elements(document) {
                if is_badge(dom, element) {
                    if let Some(placement) = placement(dom, element, &frame) {
                        plan.badges.push(placement);
                    }
                } else if dom.attribute(element, ORIGINAL_OPACITY_ATTRIBUTE).is_some() {
                    plan.suppressed.push(SuppressedElement {
                        frame: frame.path().to_vec(),
                        xpath: compute_xpath(dom, element, &FrameContext::main()),
                    });
                }
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty() && self.suppressed.is_empty()
    }
}

fn placement<D: Dom + ?Sized>(dom: &D, badge: NodeId, frame: &FrameContext) -> Option<BadgePlacement> {
    let parent = dom.parent_element(badge)?;
    let index = dom
        .child_nodes(parent)
        .iter()
        .take_while(|child| **child != badge)
        .filter(|child| !is_badge(dom, **child))
        .count();
    let position = if dom.inline_style(badge, "position") == Some("absolute") {
        let rect = dom.bounding_rect(badge);
        Some(BadgePosition {
            left: rect.left(),
            top: rect.top(),
        })
    } else {
        None
    };

    Some(BadgePlacement {
        frame: frame.path().to_vec(),
        parent_xpath: compute_xpath(dom, parent, &FrameContext::main()),
        index,
        glyph: dom.inner_text(badge),
        label: dom.attribute(badge, BADGE_LABEL_ATTRIBUTE)?.to_string(),
        font_size: dom.computed_style(badge).font_size,
        position,
    })
}

/// Badge element template and marker names handed to the live-page scripts
pub fn badge_template() -> Value {
    let style: serde_json::Map<String, Value> = BADGE_STYLE
        .iter()
        .map(|(property, value)| (property.to_string(), json!(value)))
        .collect();
    json!({
        "id": BADGE_ID,
        "labelAttribute": BADGE_LABEL_ATTRIBUTE,
        "opacityAttribute": ORIGINAL_OPACITY_ATTRIBUTE,
        "visibilityAttribute": ORIGINAL_VISIBILITY_ATTRIBUTE,
        "style": style,
    })
}

/// Result of tagging a snapshot
#[derive(Debug, Clone)]
pub struct TaggedSnapshot {
    pub inventory: Inventory,
    /// Badges to paint onto the live page
    pub plan: BadgePlan,
    pub page: PageInfo,
    /// The tagged page
    pub dom: MemoryDom,
}

/// Load a snapshot, run a tagging pass, and return the inventory with the
/// plan that reproduces it on the live page
pub fn tag_snapshot(
    snapshot: PageSnapshot,
    config: &TaggingConfig,
    include_leaf_text: bool,
) -> anyhow::Result<TaggedSnapshot> {
    let (mut dom, ids) = snapshot.build()?;
    let inventory = PageTagger::new(&mut dom, config)?.tag_page(include_leaf_text)?;
    let plan = BadgePlan::from_dom(&dom, config.max_frame_depth);

    let focused = snapshot
        .focused
        .and_then(|id| ids.get(&id))
        .and_then(|node| focused_label(&dom, &inventory, *node));
    let page = PageInfo {
        url: snapshot.url,
        visual_viewport: snapshot.visual_viewport,
        metadata: snapshot.metadata,
        focused_label: focused,
    };
    Ok(TaggedSnapshot {
        inventory,
        plan,
        page,
        dom,
    })
}

/// Shared helpers: `webtagDocuments(maxDepth)` lists `[document, framePath]`
/// pairs and `webtagFrameDocument(path)` follows a frame path
macro_rules! js_prelude {
    () => {
        r##"
        function webtagDocuments(maxDepth) {
            const out = [[document, []]];
            for (let i = 0; i < out.length; i++) {
                const [doc, path] = out[i];
                if (path.length >= maxDepth) continue;
                const iframes = doc.getElementsByTagName("iframe");
                for (let n = 0; n < iframes.length; n++) {
                    try {
                        const inner = iframes[n].contentDocument;
                        if (inner) out.push([inner, path.concat([n])]);
                    } catch (e) {}
                }
            }
            return out;
        }
        function webtagFrameDocument(path) {
            let doc = document;
            for (const n of path) {
                const iframe = doc.getElementsByTagName("iframe")[n];
                if (!iframe) return null;
                try {
                    doc = iframe.contentDocument;
                } catch (e) {
                    return null;
                }
                if (!doc) return null;
            }
            return doc;
        }
        function webtagElements(maxDepth) {
            const out = [];
            for (const [doc, path] of webtagDocuments(maxDepth)) {
                const root = path.length === 0 ? doc.body : doc;
                if (root) out.push(...root.querySelectorAll("*"));
            }
            return out;
        }
        "##
    };
}

/// Serialise the page. Argument 0 is the frame depth to follow, argument 1
/// the map-widget selector group.
pub const CAPTURE_SCRIPT: &str = concat!(
    js_prelude!(),
    r##"
    const maxDepth = arguments[0] === undefined ? 1 : arguments[0];
    const mapSelectors = arguments[1] || "";
    const nodes = [];
    const documents = [];
    const ids = new Map();
    function px(value) {
        const n = parseFloat(value);
        return isNaN(n) ? null : n;
    }
    function box(r) {
        return { x: r.left, y: r.top, width: r.width, height: r.height };
    }
    function mapWidgets(doc) {
        if (!mapSelectors) return new Set();
        try {
            return new Set(doc.querySelectorAll(mapSelectors));
        } catch (e) {
            return new Set();
        }
    }
    function visitDocument(doc, win, depth) {
        const id = nodes.length;
        const entry = { id: id, kind: "document", children: [] };
        nodes.push(entry);
        ids.set(doc, id);
        const html = doc.documentElement;
        const body = doc.body;
        documents.push({
            id: id,
            scrollSize: {
                width: Math.max(html ? html.scrollWidth : 0, body ? body.scrollWidth : 0, html ? html.clientWidth : 0),
                height: Math.max(html ? html.scrollHeight : 0, body ? body.scrollHeight : 0, html ? html.clientHeight : 0)
            }
        });
        const maps = mapWidgets(doc);
        for (const child of doc.childNodes) entry.children.push(visit(child, win, depth, maps));
        return id;
    }
    function visit(node, win, depth, maps) {
        const id = nodes.length;
        ids.set(node, id);
        if (node.nodeType === 3) {
            const entry = { id: id, kind: "text", text: node.data, children: [] };
            const range = node.ownerDocument.createRange();
            range.selectNodeContents(node);
            const lines = range.getClientRects();
            if (lines.length > 0) entry.rect = box(lines[0]);
            nodes.push(entry);
            return id;
        }
        if (node.nodeType !== 1) {
            nodes.push({ id: id, kind: "other", children: [] });
            return id;
        }
        const style = win.getComputedStyle(node);
        const entry = {
            id: id,
            kind: "element",
            tag: node.tagName.toLowerCase(),
            attributes: {},
            children: [],
            rect: box(node.getBoundingClientRect()),
            display: style.display,
            visibility: style.visibility,
            opacity: px(style.opacity),
            fontSize: px(style.fontSize),
            inline: {}
        };
        if (maps.has(node)) entry.map = true;
        nodes.push(entry);
        for (const attr of node.attributes) entry.attributes[attr.name] = attr.value;
        if (node.style) {
            for (const property of ["opacity", "visibility", "font-size"]) {
                const value = node.style.getPropertyValue(property);
                if (value) entry.inline[property] = value;
            }
        }
        for (const child of node.childNodes) entry.children.push(visit(child, win, depth, maps));
        if (entry.tag === "iframe") {
            if (depth >= maxDepth) {
                entry.frame = { blocked: "frame depth limit" };
            } else {
                try {
                    const inner = node.contentDocument;
                    entry.frame = inner
                        ? { document: visitDocument(inner, node.contentWindow, depth + 1) }
                        : { blocked: "content document is not accessible" };
                } catch (e) {
                    entry.frame = { blocked: String(e) };
                }
            }
        }
        return id;
    }
    function visualViewport() {
        const vv = window.visualViewport;
        const de = document.documentElement;
        return {
            width: vv ? vv.width : 0,
            height: vv ? vv.height : 0,
            offsetLeft: vv ? vv.offsetLeft : 0,
            offsetTop: vv ? vv.offsetTop : 0,
            pageLeft: vv ? vv.pageLeft : 0,
            pageTop: vv ? vv.pageTop : 0,
            scale: vv ? vv.scale : 0,
            clientWidth: de ? de.clientWidth : 0,
            clientHeight: de ? de.clientHeight : 0,
            scrollWidth: de ? de.scrollWidth : 0,
            scrollHeight: de ? de.scrollHeight : 0
        };
    }
    function microdataItem(element, item) {
        for (const child of element.children) {
            const names = (child.getAttribute("itemprop") || "").split(" ").filter(Boolean);
            let value = null;
            if (child.hasAttribute("itemscope")) {
                if (names.length === 0) continue;
                value = microdataItem(child, { itemType: child.getAttribute("itemtype") });
            } else if (names.length > 0) {
                value = child.getAttribute("content") || child.href || child.src || child.textContent || "";
                value = String(value).replace(/\s+/g, " ").trim();
            }
            for (const name of names) {
                if (item[name] === undefined) {
                    item[name] = value;
                } else if (Array.isArray(item[name])) {
                    item[name].push(value);
                } else {
                    item[name] = [item[name], value];
                }
            }
            if (!child.hasAttribute("itemscope")) microdataItem(child, item);
        }
        return item;
    }
    function metadata() {
        const jsonLd = [];
        for (const script of document.querySelectorAll('script[type="application/ld+json"]')) {
            const source = script.textContent.trim();
            try {
                jsonLd.push(JSON.parse(source));
            } catch (e) {
                jsonLd.push(source);
            }
        }
        const microdata = [];
        for (const scope of document.querySelectorAll("[itemscope]:not([itemprop])")) {
            microdata.push(microdataItem(scope, { itemType: scope.getAttribute("itemtype") }));
        }
        const metaTags = {};
        for (const meta of document.querySelectorAll("meta")) {
            const key = meta.getAttribute("name") || meta.getAttribute("property");
            if (key && meta.hasAttribute("content")) metaTags[key] = meta.getAttribute("content");
        }
        return { jsonLd: jsonLd, microdata: microdata, metaTags: metaTags };
    }
    function focusedNode() {
        let active = document.activeElement;
        while (active && active.tagName && active.tagName.toLowerCase() === "iframe") {
            let inner = null;
            try {
                inner = active.contentDocument ? active.contentDocument.activeElement : null;
            } catch (e) {}
            if (!inner || !ids.has(inner)) break;
            active = inner;
        }
        return active && ids.has(active) ? ids.get(active) : null;
    }
    visitDocument(document, window, 0);
    return {
        url: String(window.location.href),
        viewport: { width: window.innerWidth, height: window.innerHeight },
        documents: documents,
        nodes: nodes,
        visualViewport: visualViewport(),
        metadata: metadata(),
        focused: focusedNode()
    };
    "##
);

/// Apply a [`BadgePlan`]. Argument 0 is the plan, argument 1 the
/// [`badge_template`]. Returns the number of badges painted.
pub const PAINT_SCRIPT: &str = concat!(
    js_prelude!(),
    r##"
    const plan = arguments[0];
    const template = arguments[1];
    function locate(doc, xpath) {
        return doc.evaluate(xpath, doc, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
    }
    // Resolve every target before inserting anything so positional steps
    // are evaluated against the untouched page
    const suppressed = plan.suppressed.map(function (item) {
        const doc = webtagFrameDocument(item.frame);
        return doc ? locate(doc, item.xpath) : null;
    });
    const targets = plan.badges.map(function (badge) {
        const doc = webtagFrameDocument(badge.frame);
        return doc ? [doc, locate(doc, badge.parentXpath)] : [null, null];
    });
    for (const element of suppressed) {
        if (!element) continue;
        if (!element.hasAttribute(template.opacityAttribute)) {
            element.setAttribute(template.opacityAttribute, element.style.getPropertyValue("opacity") || "");
        }
        element.style.setProperty("opacity", "0");
    }
    let painted = 0;
    plan.badges.forEach(function (badge, i) {
        const [doc, parent] = targets[i];
        if (!doc || !parent) return;
        const span = doc.createElement("span");
        span.id = template.id;
        span.setAttribute(template.labelAttribute, badge.label);
        for (const property in template.style) span.style.setProperty(property, template.style[property]);
        span.style.setProperty("font-size", badge.fontSize + "px");
        span.textContent = badge.glyph;
        if (badge.position) {
            span.style.setProperty("position", "absolute");
            span.style.setProperty("left", badge.position.left + "px");
            span.style.setProperty("top", badge.position.top + "px");
        }
        const children = Array.from(parent.childNodes).filter(function (child) {
            return !(child.nodeType === 1 && child.id === template.id);
        });
        const reference = children[badge.index] || null;
        parent.insertBefore(span, reference);
        painted++;
    });
    return painted;
    "##
);

/// Remove painted badges and restore suppressed map widgets. Argument 0 is
/// the frame depth, argument 1 the [`badge_template`].
pub const REMOVE_SCRIPT: &str = concat!(
    js_prelude!(),
    r##"
    const maxDepth = arguments[0] === undefined ? 1 : arguments[0];
    const template = arguments[1];
    let removed = 0;
    for (const [doc] of webtagDocuments(maxDepth)) {
        for (const badge of Array.from(doc.querySelectorAll("span"))) {
            if (badge.id !== template.id) continue;
            badge.remove();
            removed++;
        }
        const stashed = "[" + template.opacityAttribute + "]";
        for (const element of Array.from(doc.querySelectorAll(stashed))) {
            const previous = element.getAttribute(template.opacityAttribute);
            if (previous) {
                element.style.setProperty("opacity", previous);
            } else {
                element.style.removeProperty("opacity");
            }
            element.removeAttribute(template.opacityAttribute);
        }
    }
    return removed;
    "##
);

/// Hide everything but the badges, stashing prior inline visibility.
/// Argument 0 is the frame depth, argument 1 the [`badge_template`].
pub const HIDE_NON_TAG_SCRIPT: &str = concat!(
    js_prelude!(),
    r##"
    const maxDepth = arguments[0] === undefined ? 1 : arguments[0];
    const template = arguments[1];
    const elements = webtagElements(maxDepth);
    for (const element of elements) {
        if (!element.hasAttribute(template.visibilityAttribute)) {
            element.setAttribute(template.visibilityAttribute, element.style.getPropertyValue("visibility") || "");
        }
        element.style.setProperty("visibility", element.id === template.id ? "visible" : "hidden");
    }
    return elements.length;
    "##
);

/// Undo [`HIDE_NON_TAG_SCRIPT`]
pub const REVERT_VISIBILITY_SCRIPT: &str = concat!(
    js_prelude!(),
    r##"
    const maxDepth = arguments[0] === undefined ? 1 : arguments[0];
    const template = arguments[1];
    let reverted = 0;
    for (const element of webtagElements(maxDepth)) {
        if (!element.hasAttribute(template.visibilityAttribute)) continue;
        const previous = element.getAttribute(template.visibilityAttribute);
        if (previous) {
            element.style.setProperty("visibility", previous);
        } else {
            element.style.removeProperty("visibility");
        }
        element.removeAttribute(template.visibilityAttribute);
        reverted++;
    }
    return reverted;
    "##
);

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;
