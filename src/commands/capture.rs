use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use webtag::config::TaggingConfig;

use super::utils::{self, BrowserArgs};

/// Save a page snapshot for offline tagging
pub async fn handle_capture(
    url: String,
    output: Option<PathBuf>,
    browser_args: BrowserArgs,
    config: TaggingConfig,
) -> Result<()> {
    info!("Capturing {}", url);
    let browser = utils::open_browser(&browser_args, config, &url).await?;

    let result: Result<()> = async {
        let snapshot = browser.capture_snapshot().await?;
        utils::emit(&serde_json::to_string_pretty(&snapshot)?, output.as_ref())
    }
    .await;

    browser.close().await?;
    result
}
