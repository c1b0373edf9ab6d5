use anyhow::Result;
use tracing::info;

use webtag::config::TaggingConfig;
use webtag::webdriver::PageAction;

use super::utils::{self, BrowserArgs};

/// Tag `url`, then run `action` against the target labelled `label`.
///
/// Labels are only meaningful within one tagging pass, so every action
/// starts with a fresh pass in its own session.
pub async fn handle_action(
    url: String,
    label: String,
    action: PageAction,
    no_leaf_text: bool,
    browser_args: BrowserArgs,
    config: TaggingConfig,
) -> Result<()> {
    info!("Running {:?} on [{}] at {}", action, label, url);
    let include_leaf_text = config.include_leaf_text && !no_leaf_text;
    let browser = utils::open_browser(&browser_args, config, &url).await?;

    let result: Result<String> = async {
        let inventory = browser.tag_page(include_leaf_text).await?;
        browser.perform(&inventory, &label, action).await
    }
    .await;

    browser.close().await?;
    println!("{}", result?);
    Ok(())
}
