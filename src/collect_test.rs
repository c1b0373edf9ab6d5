// Unit tests for the frame collector

use super::*;
use crate::dom::fixture::{boxed, page, rect, with_text};
use crate::dom::{Extent, MemoryDom};
use pretty_assertions::assert_eq;

fn frame_page() -> (MemoryDom, Vec<NodeId>) {
    let (mut dom, body) = page();
    let heading = with_text(&mut dom, body, "h1", rect(0.0, 0.0, 400.0, 40.0), "Title");
    let blocked = boxed(&mut dom, body, "iframe", rect(0.0, 50.0, 300.0, 200.0));
    let open = boxed(&mut dom, body, "iframe", rect(0.0, 260.0, 300.0, 200.0));
    dom.block_frame(blocked, "https://ads.example");

    let frame_doc = dom.new_html_document(Extent::new(300.0, 200.0));
    dom.attach_frame(open, frame_doc);
    let frame_body = dom.body(frame_doc).unwrap();
    let frame_button = with_text(&mut dom, frame_body, "button", rect(5.0, 5.0, 60.0, 20.0), "Pay");

    (dom, vec![heading, blocked, open, frame_button])
}

#[test]
fn test_frame_context_prefix() {
    assert_eq!(FrameContext::main().xpath_prefix(), "");
    assert!(FrameContext::main().is_main());
    assert_eq!(FrameContext::main().child(3).xpath_prefix(), "iframe[3]");
    assert_eq!(FrameContext::main().child(0).child(2).xpath_prefix(), "iframe[0]iframe[2]");
    assert_eq!(FrameContext::main().child(0).child(2).index(), Some(2));
}

#[test]
fn test_main_document_then_frames() {
    let (dom, nodes) = frame_page();
    let collected = collect_all_elements(&dom, 1);

    let main: Vec<NodeId> = collected
        .iter()
        .filter(|c| c.frame.is_main())
        .map(|c| c.node)
        .collect();
    assert_eq!(main, vec![nodes[0], nodes[1], nodes[2]]);

    // The blocked iframe still consumes ordinal 0
    let framed: Vec<&Collected> = collected.iter().filter(|c| !c.frame.is_main()).collect();
    assert!(framed.iter().all(|c| c.frame.index() == Some(1)));
    let tags: Vec<&str> = framed
        .iter()
        .map(|c| dom.tag_name(c.node).unwrap())
        .collect();
    assert_eq!(tags, vec!["html", "head", "body", "button"]);
    assert_eq!(framed.last().unwrap().node, nodes[3]);
}

#[test]
fn test_depth_zero_ignores_frames() {
    let (dom, _) = frame_page();
    let collected = collect_all_elements(&dom, 0);
    assert!(collected.iter().all(|c| c.frame.is_main()));
    assert_eq!(collected.len(), 3);
}

#[test]
fn test_nested_frames_need_extra_depth() {
    let (mut dom, nodes) = frame_page();
    let frame_doc = dom.owner_document(nodes[3]);
    let frame_body = dom.body(frame_doc).unwrap();
    let inner_iframe = boxed(&mut dom, frame_body, "iframe", rect(0.0, 40.0, 100.0, 100.0));
    let inner_doc = dom.new_html_document(Extent::new(100.0, 100.0));
    dom.attach_frame(inner_iframe, inner_doc);
    let inner_body = dom.body(inner_doc).unwrap();
    let deep = with_text(&mut dom, inner_body, "a", rect(0.0, 0.0, 30.0, 10.0), "Deep");

    assert!(!collect_all_elements(&dom, 1).iter().any(|c| c.node == deep));

    let collected = collect_all_elements(&dom, 2);
    let found = collected.iter().find(|c| c.node == deep).unwrap();
    assert_eq!(found.frame, FrameContext::from_path(vec![1, 0]));
    assert!(all_documents(&dom, 2).contains(&(inner_doc, FrameContext::from_path(vec![1, 0]))));
    assert!(all_documents(&dom, 1).iter().all(|(doc, _)| *doc != inner_doc));
}

#[test]
fn test_page_without_body() {
    let dom = MemoryDom::new(Extent::new(800.0, 600.0));
    assert!(collect_all_elements(&dom, 1).is_empty());
    assert_eq!(all_documents(&dom, 1).len(), 1);
}
