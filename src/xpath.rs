//! XPath synthesis for tagged elements, and a resolver for the paths it
//! produces.
//!
//! Generated paths look like `//html/body/div[2]/a[@class="nav"]`, optionally
//! preceded by one `iframe[N]` per frame level (`iframe[1]//html/body/input`).
//! The resolver understands exactly that subset: a descendant first step,
//! child steps, positional predicates, `@id`/`@class` equality and
//! `name()` tests. Badges inserted by the engine are invisible to both sides.

use regex::Regex;
use thiserror::Error;

use crate::collect::FrameContext;
use crate::dom::{is_badge, Dom, NodeId};

lazy_static::lazy_static! {
    static ref NAMESPACED_TAG: Regex =
        Regex::new(r"^[a-zA-Z_][\w\-.]*:[a-zA-Z_][\w\-.]*$").unwrap();
    static ref FRAME_PREFIX: Regex = Regex::new(r"^iframe\[(\d+)\]").unwrap();
}

/// Number of accumulated steps after which an `id` ends the walk
const ID_SHORT_CIRCUIT_DEPTH: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum XPathError {
    #[error("unsupported xpath syntax in '{0}'")]
    Unsupported(String),

    #[error("unterminated predicate in '{0}'")]
    Unterminated(String),
}

/// Absolute path from the document root of `frame` to `node`
pub fn compute_xpath<D: Dom + ?Sized>(dom: &D, node: NodeId, frame: &FrameContext) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut cursor = Some(node);

    while let Some(current) = cursor {
        let Some(tag) = dom.tag_name(current) else {
            cursor = dom.parent(current);
            continue;
        };

        let mut step = escape_namespace(tag);
        let (index, has_twin) = sibling_position(dom, current, tag);
        if index > 1 || has_twin {
            step.push_str(&format!("[{}]", index));
        }

        if let Some(id) = dom.attribute(current, "id").filter(|id| !id.is_empty()) {
            step.push_str(&format!("[@id={}]", literal(id)));
            if parts.len() > ID_SHORT_CIRCUIT_DEPTH {
                parts.insert(0, step);
                break;
            }
        } else if let Some(class) = dom.attribute(current, "class").filter(|c| !c.is_empty()) {
            step.push_str(&format!("[@class={}]", literal(class)));
        }

        parts.insert(0, step);
        cursor = dom.parent(current);
    }

    format!("{}//{}", frame.xpath_prefix(), parts.join("/"))
}

/// 1-based index among same-tag siblings, and whether a later sibling
/// shares the tag
fn sibling_position<D: Dom + ?Sized>(dom: &D, node: NodeId, tag: &str) -> (usize, bool) {
    let Some(parent) = dom.parent(node) else {
        return (1, false);
    };
    let twins: Vec<NodeId> = dom
        .element_children(parent)
        .into_iter()
        .filter(|sibling| dom.has_tag(*sibling, tag) && !is_badge(dom, *sibling))
        .collect();
    match twins.iter().position(|sibling| *sibling == node) {
        Some(position) => (position + 1, twins.len() > position + 1),
        None => (1, false),
    }
}

fn escape_namespace(tag: &str) -> String {
    if NAMESPACED_TAG.is_match(tag) {
        format!("*[name()=\"{}\"]", tag)
    } else {
        tag.to_string()
    }
}

/// Quote `value` as an XPath string literal
pub fn literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let mut pieces: Vec<String> = Vec::new();
    for (i, chunk) in value.split('"').enumerate() {
        if i > 0 {
            pieces.push("'\"'".to_string());
        }
        if !chunk.is_empty() {
            pieces.push(format!("\"{}\"", chunk));
        }
    }
    format!("concat({})", pieces.join(", "))
}

/// Split the leading `iframe[N]` steps off a generated path
pub fn split_frame_prefix(xpath: &str) -> (Vec<u32>, &str) {
    let mut frames = Vec::new();
    let mut rest = xpath;
    while let Some(captures) = FRAME_PREFIX.captures(rest) {
        let Ok(index) = captures[1].parse::<u32>() else {
            break;
        };
        frames.push(index);
        rest = &rest[captures[0].len()..];
    }
    (frames, rest)
}

/// Document reached by following `frames` from the top-level document
pub fn frame_document<D: Dom + ?Sized>(dom: &D, frames: &[u32]) -> Option<NodeId> {
    let mut document = dom.document();
    for index in frames {
        let iframe = *dom
            .elements_by_tag(document, "iframe")
            .get(*index as usize)?;
        document = dom.content_document(iframe).ok().flatten()?;
    }
    Some(document)
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Position(usize),
    Name(String),
    Attribute(String, String),
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    /// `None` for `*`
    name: Option<String>,
    predicates: Vec<Predicate>,
}

/// Evaluate a generated path; an empty result means nothing matched
pub fn resolve<D: Dom + ?Sized>(dom: &D, xpath: &str) -> Result<Vec<NodeId>, XPathError> {
    let (frames, path) = split_frame_prefix(xpath);
    let Some(relative) = path.strip_prefix("//") else {
        return Err(XPathError::Unsupported(xpath.to_string()));
    };
    let steps = split_steps(relative)?
        .iter()
        .map(|raw| parse_step(raw))
        .collect::<Result<Vec<Step>, XPathError>>()?;
    let Some(document) = frame_document(dom, &frames) else {
        return Ok(Vec::new());
    };

    let mut context: Vec<NodeId> = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        let parents: Vec<NodeId> = if i == 0 {
            // `//step`: every node that can be a parent of an element
            let mut all = vec![document];
            all.extend(dom.descendant_elements(document));
            all
        } else {
            context
        };
        context = Vec::new();
        for parent in parents {
            for node in apply_step(dom, parent, step) {
                if !context.contains(&node) {
                    context.push(node);
                }
            }
        }
    }
    Ok(context)
}

/// The `index`-th (1-based) text child of `element`
pub fn resolve_text_node<D: Dom + ?Sized>(dom: &D, element: NodeId, index: u32) -> Option<NodeId> {
    let index = (index as usize).checked_sub(1)?;
    dom.child_nodes(element)
        .iter()
        .copied()
        .filter(|child| dom.is_text(*child))
        .nth(index)
}

fn apply_step<D: Dom + ?Sized>(dom: &D, parent: NodeId, step: &Step) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> = dom
        .element_children(parent)
        .into_iter()
        .filter(|child| !is_badge(dom, *child))
        .filter(|child| match &step.name {
            Some(name) => dom.tag_name(*child) == Some(name.as_str()),
            None => true,
        })
        .collect();

    for predicate in &step.predicates {
        nodes = match predicate {
            Predicate::Position(n) => nodes.get(n.wrapping_sub(1)).copied().into_iter().collect(),
            Predicate::Name(name) => nodes
                .into_iter()
                .filter(|node| dom.tag_name(*node) == Some(name.as_str()))
                .collect(),
            Predicate::Attribute(attribute, value) => nodes
                .into_iter()
                .filter(|node| dom.attribute(*node, attribute) == Some(value.as_str()))
                .collect(),
        };
    }
    nodes
}

/// Split on `/` outside of predicates and string literals
fn split_steps(path: &str) -> Result<Vec<&str>, XPathError> {
    let mut steps = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in path.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '/') if depth == 0 => {
                steps.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() || depth > 0 {
        return Err(XPathError::Unterminated(path.to_string()));
    }
    steps.push(&path[start..]);

    if steps.iter().any(|s| s.is_empty()) {
        return Err(XPathError::Unsupported(path.to_string()));
    }
    Ok(steps)
}

fn parse_step(raw: &str) -> Result<Step, XPathError> {
    let name_end = raw.find('[').unwrap_or(raw.len());
    let name = match &raw[..name_end] {
        "*" => None,
        "" => return Err(XPathError::Unsupported(raw.to_string())),
        tag => Some(tag.to_string()),
    };

    let mut predicates = Vec::new();
    let mut rest = &raw[name_end..];
    while !rest.is_empty() {
        let close = predicate_end(rest).ok_or_else(|| XPathError::Unterminated(raw.to_string()))?;
        predicates.push(parse_predicate(&rest[1..close], raw)?);
        rest = &rest[close + 1..];
    }
    Ok(Step { name, predicates })
}

/// Byte offset of the `]` closing the predicate that opens `rest`
fn predicate_end(rest: &str) -> Option<usize> {
    if !rest.starts_with('[') {
        return None;
    }
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_predicate(body: &str, raw: &str) -> Result<Predicate, XPathError> {
    let unsupported = || XPathError::Unsupported(raw.to_string());

    if let Ok(position) = body.trim().parse::<usize>() {
        return Ok(Predicate::Position(position));
    }
    if let Some(value) = body.strip_prefix("name()=") {
        return Ok(Predicate::Name(parse_literal(value).ok_or_else(unsupported)?));
    }
    if let Some(rest) = body.strip_prefix('@')
        && let Some((attribute, value)) = rest.split_once('=')
    {
        let value = parse_literal(value).ok_or_else(unsupported)?;
        return Ok(Predicate::Attribute(attribute.to_string(), value));
    }
    Err(unsupported())
}

/// Parse a quoted string or a `concat()` of quoted strings
fn parse_literal(source: &str) -> Option<String> {
    let source = source.trim();
    if let Some(inner) = source
        .strip_prefix("concat(")
        .and_then(|s| s.strip_suffix(')'))
    {
        let mut out = String::new();
        let mut rest = inner.trim_start();
        while !rest.is_empty() {
            let quote = rest.chars().next()?;
            if quote != '"' && quote != '\'' {
                return None;
            }
            let end = rest[1..].find(quote)? + 1;
            out.push_str(&rest[1..end]);
            rest = rest[end + 1..].trim_start();
            rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
        }
        return Some(out);
    }

    let quote = source.chars().next()?;
    if (quote == '"' || quote == '\'') && source.len() >= 2 && source.ends_with(quote) {
        Some(source[1..source.len() - 1].to_string())
    } else {
        None
    }
}

#[cfg(test)]
#[path = "xpath_test.rs"]
mod xpath_test;
