// Page-building helpers shared by unit tests

use super::{Dom, ElementSpec, Extent, MemoryDom, NodeId, Rect};

pub(crate) fn viewport() -> Extent {
    Extent::new(1280.0, 800.0)
}

/// Blank page; returns the DOM and its body
pub(crate) fn page() -> (MemoryDom, NodeId) {
    let dom = MemoryDom::html_page(viewport());
    let body = dom.body(dom.document()).expect("skeleton has a body");
    (dom, body)
}

/// Append a rendered element with the given rectangle
pub(crate) fn boxed(dom: &mut MemoryDom, parent: NodeId, tag: &str, rect: Rect) -> NodeId {
    dom.append_element(parent, ElementSpec::new(tag).with_rect(rect))
}

/// Append a rendered element holding a single text node
pub(crate) fn with_text(
    dom: &mut MemoryDom,
    parent: NodeId,
    tag: &str,
    rect: Rect,
    text: &str,
) -> NodeId {
    let el = boxed(dom, parent, tag, rect);
    dom.append_text(el, text);
    el
}

/// Append an element described by `spec`, holding `text` when non-empty
pub(crate) fn spec_with_text(
    dom: &mut MemoryDom,
    parent: NodeId,
    spec: ElementSpec,
    text: &str,
) -> NodeId {
    let el = dom.append_element(parent, spec);
    if !text.is_empty() {
        dom.append_text(el, text);
    }
    el
}

pub(crate) fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, width, height)
}
