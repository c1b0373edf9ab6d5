use super::*;
use anyhow::{anyhow, Context};
use pretty_assertions::assert_eq;

#[test]
fn test_exit_codes_follow_error_kind() {
    let cases = [
        (anyhow!("Label not found: 12"), 2, "label_not_found"),
        (anyhow!("Malformed tag inventory: missing field `xpath`"), 3, "malformed_inventory"),
        (anyhow!("Failed to connect to WebDriver"), 4, "webdriver_failed"),
        (anyhow!("script timeout"), 5, "timeout"),
        (anyhow!("disk full"), 1, "error"),
    ];
    for (err, code, kind) in cases {
        let err = WebtagError::from(err);
        assert_eq!(err.exit_code(), code);
        assert_eq!(err.kind(), kind);
    }
}

#[test]
fn test_context_does_not_hide_the_cause() {
    let err: anyhow::Result<()> =
        Err(anyhow!("Malformed page snapshot: no documents")).context("Failed to load snapshot");
    let err = WebtagError::from(err.unwrap_err());
    assert_eq!(err.exit_code(), 3);
    assert_eq!(
        err.to_string(),
        "Failed to load snapshot: Malformed page snapshot: no documents"
    );
}
