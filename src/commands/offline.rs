use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use webtag::config::TaggingConfig;
use webtag::snapshot::{tag_snapshot, PageSnapshot};
use webtag::types::OutputFormat;

use super::utils;

/// Tag a captured snapshot without a browser
#[allow(clippy::too_many_arguments)]
pub fn handle_offline(
    snapshot: PathBuf,
    no_leaf_text: bool,
    with_plan: bool,
    with_page_info: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    config: TaggingConfig,
) -> Result<()> {
    info!("Tagging snapshot {}", snapshot.display());
    let content = std::fs::read_to_string(&snapshot)
        .with_context(|| format!("Failed to read snapshot {}", snapshot.display()))?;
    let page = PageSnapshot::from_json(&content)?;

    let include_leaf_text = config.include_leaf_text && !no_leaf_text;
    let tagged = tag_snapshot(page, &config, include_leaf_text)?;

    let rendered = utils::render_result(
        &tagged.inventory,
        format,
        with_plan.then_some(&tagged.plan),
        with_page_info.then_some(&tagged.page),
    )?;
    utils::emit(&rendered, output.as_ref())
}
