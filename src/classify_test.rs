// Unit tests for visibility and role predicates

use super::*;
use crate::dom::fixture::{boxed, page, rect, spec_with_text, with_text};
use crate::dom::{ElementSpec, MemoryDom};

fn control(dom: &mut MemoryDom, parent: NodeId, spec: ElementSpec) -> NodeId {
    dom.append_element(parent, spec.rect(10.0, 10.0, 120.0, 24.0))
}

#[test]
fn test_visible_element() {
    let (mut dom, body) = page();
    let button = with_text(&mut dom, body, "button", rect(10.0, 10.0, 80.0, 24.0), "Go");
    assert!(is_visible(&dom, button));
}

#[test]
fn test_hidden_states() {
    let (mut dom, body) = page();
    let none = control(&mut dom, body, ElementSpec::new("div").display("none"));
    let invisible = control(&mut dom, body, ElementSpec::new("div").visibility("hidden"));
    let attr_hidden = control(&mut dom, body, ElementSpec::new("div").attr("hidden", ""));
    let zero = boxed(&mut dom, body, "div", rect(10.0, 10.0, 0.0, 20.0));
    let script = control(&mut dom, body, ElementSpec::new("script"));
    let style = control(&mut dom, body, ElementSpec::new("style"));

    for node in [none, invisible, attr_hidden, zero, script, style] {
        assert!(!is_visible(&dom, node), "{:?} should be hidden", node);
    }
}

#[test]
fn test_disabled_needs_a_truthy_value() {
    let (mut dom, body) = page();
    let bare = control(&mut dom, body, ElementSpec::new("button").attr("disabled", ""));
    let valued = control(
        &mut dom,
        body,
        ElementSpec::new("button").attr("disabled", "disabled"),
    );

    assert!(is_visible(&dom, bare));
    assert!(!is_visible(&dom, valued));
}

#[test]
fn test_display_contents_ignores_zero_size() {
    let (mut dom, body) = page();
    let contents = dom.append_element(body, ElementSpec::new("div").display("contents"));
    assert!(is_visible(&dom, contents));
}

#[test]
fn test_transparent_input_with_label_stays_visible() {
    let (mut dom, body) = page();
    let labelled = control(
        &mut dom,
        body,
        ElementSpec::new("input")
            .attr("type", "checkbox")
            .attr("id", "agree")
            .opacity(0.0),
    );
    with_text(&mut dom, body, "label", rect(0.0, 40.0, 80.0, 20.0), "Agree");
    dom.set_attribute(dom.element_children(body)[1], "for", "agree");

    let lonely_parent = boxed(&mut dom, body, "div", rect(0.0, 100.0, 200.0, 40.0));
    let lonely = control(
        &mut dom,
        lonely_parent,
        ElementSpec::new("input").attr("type", "checkbox").opacity(0.0),
    );
    let transparent_div = control(&mut dom, body, ElementSpec::new("div").opacity(0.0));

    assert!(has_associated_label(&dom, labelled));
    assert!(is_visible(&dom, labelled));
    assert!(!has_associated_label(&dom, lonely));
    assert!(!is_visible(&dom, lonely));
    assert!(!is_visible(&dom, transparent_div));
}

#[test]
fn test_sibling_label_counts_as_association() {
    let (mut dom, body) = page();
    let wrapper = boxed(&mut dom, body, "div", rect(0.0, 0.0, 200.0, 40.0));
    with_text(&mut dom, wrapper, "label", rect(0.0, 0.0, 50.0, 20.0), "Name");
    let input = control(&mut dom, wrapper, ElementSpec::new("input"));
    let div = control(&mut dom, wrapper, ElementSpec::new("div"));

    assert!(has_associated_label(&dom, input));
    // Only form controls can carry labels
    assert!(!has_associated_label(&dom, div));
}

#[test]
fn test_interactable_tags() {
    let (mut dom, body) = page();
    for tag in ["a", "button", "textarea", "select", "details", "label"] {
        let el = control(&mut dom, body, ElementSpec::new(tag));
        assert!(is_interactable(&dom, el), "{} should be interactable", tag);
    }

    let text_input = control(&mut dom, body, ElementSpec::new("input").attr("type", "text"));
    let hidden_input = control(&mut dom, body, ElementSpec::new("input").attr("type", "hidden"));
    let role_button = control(&mut dom, body, ElementSpec::new("div").attr("role", "button"));
    let role_link = control(&mut dom, body, ElementSpec::new("div").attr("role", "link"));
    let plain = control(&mut dom, body, ElementSpec::new("p"));

    assert!(is_interactable(&dom, text_input));
    assert!(!is_interactable(&dom, hidden_input));
    assert!(is_interactable(&dom, role_button));
    assert!(!is_interactable(&dom, role_link));
    assert!(!is_interactable(&dom, plain));
}

#[test]
fn test_label_wrapping_input_defers() {
    let (mut dom, body) = page();
    let label = boxed(&mut dom, body, "label", rect(0.0, 0.0, 200.0, 30.0));
    let input = control(&mut dom, label, ElementSpec::new("input").attr("type", "radio"));

    assert!(!is_interactable(&dom, label));
    assert!(is_interactable(&dom, input));
}

#[test]
fn test_text_insertable_types() {
    let (mut dom, body) = page();
    for kind in ["text", "password", "email", "search", "url", "tel", "number", "TEXT"] {
        let el = control(&mut dom, body, ElementSpec::new("input").attr("type", kind));
        assert!(is_text_insertable(&dom, el), "{} should accept text", kind);
    }
    for kind in ["checkbox", "submit", "radio", "file"] {
        let el = control(&mut dom, body, ElementSpec::new("input").attr("type", kind));
        assert!(!is_text_insertable(&dom, el), "{} should not accept text", kind);
    }

    let untyped = control(&mut dom, body, ElementSpec::new("input"));
    let unknown = control(&mut dom, body, ElementSpec::new("input").attr("type", "fancy"));
    let textarea = control(&mut dom, body, ElementSpec::new("textarea"));
    let div = control(&mut dom, body, ElementSpec::new("div"));
    assert!(is_text_insertable(&dom, untyped));
    assert!(is_text_insertable(&dom, unknown));
    assert!(is_text_insertable(&dom, textarea));
    assert!(!is_text_insertable(&dom, div));
}

#[test]
fn test_textless_leaf_rules() {
    let (mut dom, body) = page();
    let empty = boxed(&mut dom, body, "div", rect(10.0, 10.0, 50.0, 50.0));
    let blank = with_text(&mut dom, body, "span", rect(10.0, 70.0, 50.0, 20.0), "   \n ");
    let worded = with_text(&mut dom, body, "span", rect(10.0, 90.0, 50.0, 20.0), "Hi");
    let parent = boxed(&mut dom, body, "div", rect(10.0, 120.0, 50.0, 50.0));
    boxed(&mut dom, parent, "img", rect(10.0, 120.0, 20.0, 20.0));
    let empty_button = control(&mut dom, body, ElementSpec::new("button"));
    let off_page = boxed(&mut dom, body, "div", rect(10.0, 5000.0, 50.0, 50.0));
    let negative = boxed(&mut dom, body, "div", rect(-100.0, 10.0, 50.0, 50.0));

    assert!(is_textless(&dom, empty));
    assert!(is_textless(&dom, blank));
    assert!(!is_textless(&dom, worded));
    assert!(!is_textless(&dom, parent));
    assert!(!is_textless(&dom, empty_button));
    // Outside the document bounds the emptiness check does not apply
    assert!(!is_textless(&dom, off_page));
    assert!(!is_textless(&dom, negative));
}

#[test]
fn test_word_like_text() {
    assert!(is_taggable_text("Hello"));
    assert!(is_taggable_text("  42 "));
    assert!(is_taggable_text("····"));
    assert!(!is_taggable_text("|"));
    assert!(!is_taggable_text(" / "));
    assert!(!is_taggable_text(">>"));
    assert!(!is_taggable_text("   "));
    assert!(!is_taggable_text("\u{200B}"));
}

#[test]
fn test_role_assignment() {
    let (mut dom, body) = page();
    let text_input = control(&mut dom, body, ElementSpec::new("input").attr("type", "text"));
    let role_button = control(&mut dom, body, ElementSpec::new("div").attr("role", "button"));
    let anchor = control(&mut dom, body, ElementSpec::new("a"));
    let paragraph = spec_with_text(
        &mut dom,
        body,
        ElementSpec::new("p").rect(0.0, 0.0, 100.0, 20.0),
        "Hello",
    );

    assert_eq!(assign_role(&dom, text_input), Role::Input);
    assert_eq!(assign_role(&dom, role_button), Role::Clickable);
    assert_eq!(assign_role(&dom, anchor), Role::Clickable);
    assert_eq!(assign_role(&dom, paragraph), Role::Text);
}

#[test]
fn test_accessible_name_modes() {
    let (mut dom, body) = page();
    let heading = with_text(&mut dom, body, "span", rect(0.0, 0.0, 50.0, 20.0), " Search ");
    dom.set_attribute(heading, "id", "search-heading");
    let labelled_by = control(
        &mut dom,
        body,
        ElementSpec::new("input").attr("aria-labelledby", "search-heading missing"),
    );
    let aria = control(&mut dom, body, ElementSpec::new("button").attr("aria-label", "Close"));
    let empty_aria = control(&mut dom, body, ElementSpec::new("button").attr("aria-label", ""));
    let titled = control(&mut dom, body, ElementSpec::new("a").attr("title", "Home"));
    let texty = with_text(&mut dom, body, "a", rect(0.0, 0.0, 50.0, 20.0), "  Docs ");

    let attr = AriaNameMode::Attribute;
    let approx = AriaNameMode::Approximate;
    assert_eq!(accessible_name(&dom, aria, attr), Some("Close".to_string()));
    assert_eq!(accessible_name(&dom, empty_aria, attr), None);
    assert_eq!(accessible_name(&dom, titled, attr), None);

    assert_eq!(
        accessible_name(&dom, labelled_by, approx),
        Some("Search".to_string())
    );
    assert_eq!(accessible_name(&dom, titled, approx), Some("Home".to_string()));
    assert_eq!(accessible_name(&dom, texty, approx), Some("Docs".to_string()));
}

#[test]
fn test_approximate_name_from_label_elements() {
    let (mut dom, body) = page();
    let for_label = with_text(&mut dom, body, "label", rect(0.0, 0.0, 50.0, 20.0), "Email ");
    dom.set_attribute(for_label, "for", "email");
    let email = control(&mut dom, body, ElementSpec::new("input").attr("id", "email"));

    let wrapping = with_text(&mut dom, body, "label", rect(0.0, 40.0, 80.0, 20.0), "Remember me");
    let checkbox = control(&mut dom, wrapping, ElementSpec::new("input").attr("type", "checkbox"));

    let approx = AriaNameMode::Approximate;
    assert_eq!(accessible_name(&dom, email, approx), Some("Email".to_string()));
    assert_eq!(
        accessible_name(&dom, checkbox, approx),
        Some("Remember me".to_string())
    );
}
