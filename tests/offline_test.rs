// Offline tagging through the CLI, no browser required

use pretty_assertions::assert_eq;
use serde_json::Value;

mod common;
use common::{checkout_snapshot, run_webtag, write_temp};

fn snapshot_file() -> (tempfile::TempDir, String) {
    let (dir, path) = write_temp("checkout.json", &checkout_snapshot().to_string());
    (dir, path.display().to_string())
}

fn field<'a>(entry: &'a Value, name: &str) -> &'a Value {
    &entry[name]
}

#[test]
fn test_offline_tagging_lists_every_target() {
    let (_dir, path) = snapshot_file();
    let (stdout, stderr, code) = run_webtag(&["offline", &path]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let inventory: Value = serde_json::from_str(&stdout).unwrap();
    let data = inventory["data"].as_array().unwrap();
    let summary: Vec<(String, String)> = data
        .iter()
        .map(|entry| {
            (
                field(entry, "role").as_str().unwrap().to_string(),
                field(entry, "xpath").as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("text".to_string(), "//html/body/h1".to_string()),
            ("clickable".to_string(), "//html/body/a".to_string()),
            ("clickable".to_string(), "//html/body/button[@id=\"pay\"]".to_string()),
            ("input".to_string(), "//html/body/input".to_string()),
            ("text".to_string(), "//html/body/p".to_string()),
        ]
    );

    let labels: Vec<&str> = data.iter().map(|e| e["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["0", "1", "2", "3", "4"]);
    assert_eq!(data[0]["textNodeIndex"], 1);
    assert_eq!(data[3]["ariaLabel"], "Email");
    assert!(data[2].get("textNodeIndex").is_none());
}

#[test]
fn test_offline_tagging_without_leaf_text() {
    let (_dir, path) = snapshot_file();
    let (stdout, _, code) = run_webtag(&["offline", &path, "--no-leaf-text", "--format", "simple"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "[0] clickable //html/body/a\n\
         [1] clickable //html/body/button[@id=\"pay\"]\n\
         [2] input //html/body/input \"Email\""
    );
}

#[test]
fn test_plan_has_one_badge_per_entry() {
    let (_dir, path) = snapshot_file();
    let (stdout, _, code) = run_webtag(&["offline", &path, "--plan"]);
    assert_eq!(code, 0);

    let result: Value = serde_json::from_str(&stdout).unwrap();
    let badges = result["plan"]["badges"].as_array().unwrap();
    assert_eq!(badges.len(), result["data"].as_array().unwrap().len());
    let glyphs: Vec<&str> = badges.iter().map(|b| b["glyph"].as_str().unwrap()).collect();
    assert_eq!(glyphs, vec!["[0]", "[@1]", "[$2]", "[#3]", "[4]"]);
    assert!(badges.iter().all(|b| b["fontSize"].as_f64().unwrap() >= 11.0));
}

#[test]
fn test_page_info_reports_focus_and_metadata() {
    let mut snapshot = checkout_snapshot();
    snapshot["focused"] = serde_json::json!(9);
    snapshot["metadata"] = serde_json::json!({ "metaTags": { "og:title": "Checkout" } });
    let (_dir, path) = write_temp("focused.json", &snapshot.to_string());

    let (stdout, stderr, code) =
        run_webtag(&["offline", &path.display().to_string(), "--page-info"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let result: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["data"].as_array().unwrap().len(), 5);
    assert_eq!(result["page"]["url"], "https://shop.example/checkout");
    assert_eq!(result["page"]["focusedLabel"], "2");
    assert_eq!(result["page"]["metadata"]["metaTags"]["og:title"], "Checkout");
    assert!(result.get("plan").is_none());
}

#[test]
fn test_map_widgets_in_snapshot_are_suppressed() {
    let mut snapshot = checkout_snapshot();
    snapshot["nodes"][12]["map"] = serde_json::json!(true);
    let (_dir, path) = write_temp("map.json", &snapshot.to_string());

    let (stdout, _, code) = run_webtag(&["offline", &path.display().to_string(), "--plan"]);
    assert_eq!(code, 0);
    let result: Value = serde_json::from_str(&stdout).unwrap();
    let data = result["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert!(data.iter().all(|e| e["xpath"] != "//html/body/p"));
    assert_eq!(
        result["plan"]["suppressed"],
        serde_json::json!([{ "frame": [], "xpath": "//html/body/p" }])
    );
}

#[test]
fn test_config_file_changes_nesting_policy() {
    let (_dir, path) = snapshot_file();
    let (_config_dir, config) = write_temp("config.toml", "nesting_absorb_limit = 0\n");
    let config = config.display().to_string();

    let (stdout, stderr, code) = run_webtag(&["--config", &config, "offline", &path]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let inventory: Value = serde_json::from_str(&stdout).unwrap();
    let data = inventory["data"].as_array().unwrap();
    assert_eq!(data.len(), 6);
    assert_eq!(data[2]["xpath"], "//html/body/a/span");
    assert_eq!(data[2]["role"], "text");
}

#[test]
fn test_output_file_receives_inventory() {
    let (dir, path) = snapshot_file();
    let output = dir.path().join("inventory.json");
    let (stdout, _, code) = run_webtag(&[
        "offline",
        &path,
        "--output",
        &output.display().to_string(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.trim().is_empty());

    let inventory: Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(inventory["data"].as_array().unwrap().len(), 5);
}

#[test]
fn test_malformed_snapshot_exits_with_code_3() {
    let (_dir, path) = write_temp("broken.json", r#"{"viewport": {"width": 10}}"#);
    let (stdout, stderr, code) = run_webtag(&["offline", &path.display().to_string()]);
    assert_eq!(code, 3);

    let error: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(error["error"], true);
    assert_eq!(error["kind"], "malformed_inventory");
    assert_eq!(error["exit_code"], 3);
    assert!(stderr.contains("Malformed page snapshot"));
}

#[test]
fn test_dangling_node_is_malformed() {
    let mut snapshot = checkout_snapshot();
    snapshot["nodes"][3]["children"] = serde_json::json!([4, 6, 9, 11, 13, 42]);
    let (_dir, path) = write_temp("dangling.json", &snapshot.to_string());
    let (_, _, code) = run_webtag(&["offline", &path.display().to_string()]);
    assert_eq!(code, 3);
}

#[test]
fn test_missing_snapshot_is_a_generic_error() {
    let (stdout, _, code) = run_webtag(&["offline", "/nonexistent/webtag/page.json"]);
    assert_eq!(code, 1);
    let error: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert!(error["message"].as_str().unwrap().contains("Failed to read snapshot"));
}
