use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use webtag::config::TaggingConfig;
use webtag::types::OutputFormat;

use super::utils::{self, BrowserArgs};

#[allow(clippy::too_many_arguments)]
pub async fn handle_tag(
    url: String,
    no_leaf_text: bool,
    hide_others: bool,
    with_page_info: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    browser_args: BrowserArgs,
    config: TaggingConfig,
) -> Result<()> {
    info!("Tagging {}", url);
    let include_leaf_text = config.include_leaf_text && !no_leaf_text;
    let browser = utils::open_browser(&browser_args, config, &url).await?;

    let result: Result<()> = async {
        let (inventory, page) = browser.tag_page_with_info(include_leaf_text).await?;
        if hide_others {
            browser.hide_non_tag_elements().await?;
        }
        let rendered =
            utils::render_result(&inventory, format, None, with_page_info.then_some(&page))?;
        utils::emit(&rendered, output.as_ref())
    }
    .await;

    browser.close().await?;
    result
}
