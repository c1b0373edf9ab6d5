// Common test utilities and fixtures

use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Run the webtag binary, returning stdout, stderr and the exit code
pub fn run_webtag(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_webtag"))
        .args(args)
        .env("RUST_LOG", "webtag=warn")
        .output()
        .expect("Failed to execute webtag command");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write `contents` into a fresh temporary directory
pub fn write_temp(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    (dir, path)
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Value {
    json!({ "x": x, "y": y, "width": width, "height": height })
}

/// Snapshot of a small checkout page.
///
/// Heading, a link wrapping a span, a button with an id, an email field
/// with an `aria-label`, and a paragraph.
pub fn checkout_snapshot() -> Value {
    json!({
        "url": "https://shop.example/checkout",
        "viewport": { "width": 1280.0, "height": 800.0 },
        "documents": [
            { "id": 0, "scrollSize": { "width": 1280.0, "height": 800.0 } }
        ],
        "nodes": [
            { "id": 0, "kind": "document", "children": [1] },
            { "id": 1, "kind": "element", "tag": "html", "children": [2, 3],
              "rect": rect(0.0, 0.0, 1280.0, 800.0) },
            { "id": 2, "kind": "element", "tag": "head", "display": "none" },
            { "id": 3, "kind": "element", "tag": "body", "children": [4, 6, 9, 11, 13],
              "rect": rect(0.0, 0.0, 1280.0, 800.0) },
            { "id": 4, "kind": "element", "tag": "h1", "children": [5],
              "rect": rect(10.0, 10.0, 600.0, 40.0) },
            { "id": 5, "kind": "text", "text": "Checkout" },
            { "id": 6, "kind": "element", "tag": "a", "attributes": { "href": "/" },
              "children": [7], "rect": rect(10.0, 60.0, 100.0, 30.0) },
            { "id": 7, "kind": "element", "tag": "span", "children": [8],
              "rect": rect(10.0, 60.0, 80.0, 30.0) },
            { "id": 8, "kind": "text", "text": "Home" },
            { "id": 9, "kind": "element", "tag": "button", "attributes": { "id": "pay" },
              "children": [10], "rect": rect(10.0, 100.0, 120.0, 30.0) },
            { "id": 10, "kind": "text", "text": "Pay now" },
            { "id": 11, "kind": "element", "tag": "input",
              "attributes": { "type": "email", "aria-label": "Email" },
              "rect": rect(10.0, 150.0, 300.0, 30.0) },
            { "id": 13, "kind": "element", "tag": "p", "children": [14],
              "rect": rect(10.0, 200.0, 600.0, 60.0) },
            { "id": 14, "kind": "text", "text": "Orders ship within two days." }
        ]
    })
}
