use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;

use webtag::config::TaggingConfig;
use webtag::page::PageInfo;
use webtag::snapshot::BadgePlan;
use webtag::types::{Inventory, OutputFormat, ViewportSize};
use webtag::webdriver::{Browser, BrowserType};

/// Browser options shared by every command that drives a live page
#[derive(Args, Debug, Clone)]
pub struct BrowserArgs {
    /// Browser to use
    #[arg(short, long, default_value = "chrome")]
    pub browser: String,

    /// WebDriver endpoint (defaults to the browser's standard port)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
    #[arg(long)]
    pub viewport: Option<String>,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    pub no_headless: bool,
}

/// Start a session and navigate to `url`
pub async fn open_browser(args: &BrowserArgs, config: TaggingConfig, url: &str) -> Result<Browser> {
    let browser_type = BrowserType::from_str(&args.browser)?;
    let viewport = args
        .viewport
        .as_deref()
        .map(ViewportSize::parse)
        .transpose()?;

    let browser = Browser::new(
        browser_type,
        args.webdriver_url.clone(),
        viewport,
        !args.no_headless,
    )
    .await?
    .with_config(config);
    browser.goto(url).await?;
    Ok(browser)
}

/// Render an inventory in the requested format
pub fn format_inventory(inventory: &Inventory, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(inventory)?,
        OutputFormat::Simple => inventory.to_lines().join("\n"),
    })
}

/// Render an inventory with the optional badge plan and page context.
///
/// The extras only appear in JSON output, next to `data`.
pub fn render_result(
    inventory: &Inventory,
    format: OutputFormat,
    plan: Option<&BadgePlan>,
    page: Option<&PageInfo>,
) -> Result<String> {
    if matches!(format, OutputFormat::Simple) || (plan.is_none() && page.is_none()) {
        return format_inventory(inventory, format);
    }
    let mut result = serde_json::Map::new();
    result.insert("data".to_string(), serde_json::to_value(&inventory.data)?);
    if let Some(plan) = plan {
        result.insert("plan".to_string(), serde_json::to_value(plan)?);
    }
    if let Some(page) = page {
        result.insert("page".to_string(), serde_json::to_value(page)?);
    }
    Ok(serde_json::to_string_pretty(&Value::Object(result))?)
}

/// Write `contents` to `output`, or print it when no file was given
pub fn emit(contents: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", contents);
            Ok(())
        }
    }
}
