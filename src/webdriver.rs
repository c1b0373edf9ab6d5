use anyhow::{Context, Result};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Value};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::TaggingConfig;
use crate::snapshot::{
    badge_template, tag_snapshot, PageSnapshot, CAPTURE_SCRIPT, HIDE_NON_TAG_SCRIPT,
    PAINT_SCRIPT, REMOVE_SCRIPT, REVERT_VISIBILITY_SCRIPT,
};
use crate::page::PageInfo;
use crate::types::{Inventory, TagMetadata, ViewportSize};
use crate::xpath::split_frame_prefix;

/// Browser session that tags pages and acts on tagged targets
pub struct Browser {
    pub(crate) client: Client,
    browser_type: BrowserType,
    config: TaggingConfig,
    // Chrome profile directory, removed when the session is dropped
    _profile_dir: Option<TempDir>,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Default WebDriver URL for this browser type
    pub fn default_webdriver_url(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

/// What to do with a tagged target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    ScrollIntoView,
    Click,
    /// Clear the field, then type the text
    Fill(String),
    /// Read the element's text, or the tagged text node's
    ReadText,
}

/// Scroll the element into the middle of the viewport
const SCROLL_INTO_VIEW_SCRIPT: &str = r#"
    arguments[0].scrollIntoView({ block: "center", inline: "center" });
    return true;
"#;

/// Data of the `arguments[1]`-th (1-based) text child of `arguments[0]`
const TEXT_NODE_SCRIPT: &str = r#"
    const element = arguments[0];
    const index = arguments[1];
    let seen = 0;
    for (const child of element.childNodes) {
        if (child.nodeType === 3 && ++seen === index) return child.data;
    }
    return null;
"#;

/// Driver error fragments that mean "the target cannot take this action"
/// rather than "the session is broken"
const NON_INTERACTABLE_PATTERNS: &[(&str, &str)] = &[
    ("not interactable", "is not interactable"),
    ("not visible", "is not visible"),
    ("click intercepted", "is covered by another element"),
    ("invalid element state", "is in a state that does not accept this action"),
    ("not an <input>", "does not accept typed text"),
    ("not reachable by keyboard", "cannot receive keyboard input"),
];

/// Turn a driver failure into a message for the caller when it only means
/// the target cannot take the action
pub fn describe_action_failure(label: &str, error: &str) -> Option<String> {
    let lowered = error.to_lowercase();
    NON_INTERACTABLE_PATTERNS
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, description)| format!("Target [{}] {}", label, description))
}

impl Browser {
    /// Create a new browser session
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `webdriver_url` - WebDriver endpoint, the browser's default port when `None`
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        webdriver_url: Option<String>,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        let webdriver_url =
            webdriver_url.unwrap_or_else(|| browser_type.default_webdriver_url().to_string());

        if !Self::is_webdriver_running(&webdriver_url).await {
            let driver_name = browser_type.driver_name();
            anyhow::bail!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                webdriver_url,
                driver_name
            );
        }

        let mut caps = serde_json::Map::new();
        let mut profile_dir = None;

        match &browser_type {
            BrowserType::Firefox => {
                let mut firefox_opts = serde_json::Map::new();
                let mut args = Vec::new();

                if headless {
                    args.push("--headless".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }

                firefox_opts.insert("args".to_string(), json!(args));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_opts));
            }
            BrowserType::Chrome => {
                let mut chrome_opts = serde_json::Map::new();
                let mut args = vec!["--no-sandbox".to_string()];

                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }

                // Chrome refuses to share a profile directory between sessions
                let dir = tempfile::Builder::new()
                    .prefix("webtag-chrome-")
                    .tempdir()
                    .context("Failed to create Chrome profile directory")?;
                args.push(format!("--user-data-dir={}", dir.path().display()));
                profile_dir = Some(dir);

                chrome_opts.insert("args".to_string(), json!(args));
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            browser_type,
            config: TaggingConfig::default(),
            _profile_dir: profile_dir,
        })
    }

    /// Use `config` for subsequent tagging passes
    pub fn with_config(mut self, config: TaggingConfig) -> Self {
        self.config = config;
        self
    }

    async fn is_webdriver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        info!("Navigating to {}", url);
        self.client
            .goto(url.as_str())
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;

        let wait_script = r#"
            return document.readyState === 'complete';
        "#;

        // Max 2 seconds
        for _ in 0..20 {
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => {
                    break;
                }
                _ => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }

        Ok(())
    }

    async fn run_script(&self, script: &str, args: Vec<Value>, what: &str) -> Result<Value> {
        self.client
            .execute(script, args)
            .await
            .with_context(|| format!("Failed to {}", what))
    }

    fn depth_arg(&self) -> Value {
        json!(self.config.max_frame_depth)
    }

    /// Frame depth and badge template, the arguments of every cleanup script
    fn cleanup_args(&self) -> Vec<Value> {
        vec![self.depth_arg(), badge_template()]
    }

    /// Serialise the current page
    pub async fn capture_snapshot(&self) -> Result<PageSnapshot> {
        let value = self
            .run_script(
                CAPTURE_SCRIPT,
                vec![self.depth_arg(), json!(self.config.map_selector_group())],
                "capture page",
            )
            .await?;
        let snapshot = PageSnapshot::from_value(value)?;
        debug!(
            "Captured {} node(s) in {} document(s)",
            snapshot.nodes.len(),
            snapshot.documents.len()
        );
        Ok(snapshot)
    }

    /// Tag the current page and return the inventory
    pub async fn tag_page(&self, include_leaf_text: bool) -> Result<Inventory> {
        let (inventory, _) = self.tag_page_with_info(include_leaf_text).await?;
        Ok(inventory)
    }

    /// Tag the current page, also reporting its metadata, visual viewport
    /// and focused target
    pub async fn tag_page_with_info(&self, include_leaf_text: bool) -> Result<(Inventory, PageInfo)> {
        self.remove_tags().await?;
        let snapshot = self.capture_snapshot().await?;
        let tagged = tag_snapshot(snapshot, &self.config, include_leaf_text)?;
        let plan = tagged.plan;

        let painted = self
            .run_script(
                PAINT_SCRIPT,
                vec![serde_json::to_value(&plan)?, badge_template()],
                "paint tags",
            )
            .await?;
        let painted = painted.as_u64().unwrap_or_default() as usize;
        if painted != plan.badges.len() {
            warn!(
                "Painted {} of {} planned badge(s); the page changed while tagging",
                painted,
                plan.badges.len()
            );
        }

        info!("Tagged {} target(s)", tagged.inventory.len());
        Ok((tagged.inventory, tagged.page))
    }

    /// Remove all badges and restore suppressed map widgets
    pub async fn remove_tags(&self) -> Result<()> {
        let removed = self
            .run_script(REMOVE_SCRIPT, self.cleanup_args(), "remove tags")
            .await?;
        debug!("Removed {} badge(s)", removed);
        Ok(())
    }

    pub async fn hide_non_tag_elements(&self) -> Result<()> {
        self.run_script(HIDE_NON_TAG_SCRIPT, self.cleanup_args(), "hide elements")
            .await?;
        Ok(())
    }

    pub async fn revert_visibilities(&self) -> Result<()> {
        self.run_script(
            REVERT_VISIBILITY_SCRIPT,
            self.cleanup_args(),
            "revert visibilities",
        )
        .await?;
        Ok(())
    }

    /// Act on the target tagged `label`.
    ///
    /// Badges are removed first so they cannot shift positional steps or
    /// intercept clicks. When the driver reports the target as unusable for
    /// the action, the returned message says so instead of failing.
    pub async fn perform(
        &self,
        inventory: &Inventory,
        label: &str,
        action: PageAction,
    ) -> Result<String> {
        let meta = inventory
            .find(label)
            .with_context(|| format!("Label not found: {}", label))?;
        self.remove_tags().await?;

        let (frames, xpath) = split_frame_prefix(&meta.xpath);
        let outcome = match self.enter_frames(&frames).await {
            Ok(()) => self.act(meta, xpath, &action).await,
            Err(e) => Err(e.context(format!("Failed to enter the frame of [{}]", label))),
        };

        if !frames.is_empty()
            && let Err(e) = self.client.enter_frame(None).await
        {
            warn!("Failed to return to the top-level document: {}", e);
        }

        match outcome {
            Ok(message) => Ok(message),
            Err(e) => match describe_action_failure(label, &format!("{:#}", e)) {
                Some(message) => {
                    info!("{}", message);
                    Ok(message)
                }
                None => Err(e),
            },
        }
    }

    /// Follow `iframe[N]` prefixes from the current document. Ordinals count
    /// `<iframe>` elements only, so each level is entered by element rather
    /// than by `window.frames` index.
    async fn enter_frames(&self, frames: &[u32]) -> Result<()> {
        for index in frames {
            let iframe = self
                .client
                .find_all(Locator::Css("iframe"))
                .await?
                .into_iter()
                .nth(*index as usize)
                .with_context(|| format!("Frame {} no longer exists", index))?;
            iframe.enter_frame().await?;
            debug!("Entered frame {}", index);
        }
        Ok(())
    }

    async fn act(&self, meta: &TagMetadata, xpath: &str, action: &PageAction) -> Result<String> {
        debug!("Locating [{}] at {}", meta.label, xpath);
        let element = self
            .client
            .find(Locator::XPath(xpath))
            .await
            .with_context(|| format!("Element not found: {}", meta.xpath))?;

        match action {
            PageAction::ScrollIntoView => {
                self.run_with_element(SCROLL_INTO_VIEW_SCRIPT, &element, vec![])
                    .await?;
                Ok(format!("Scrolled [{}] into view", meta.label))
            }
            PageAction::Click => {
                info!("Clicking [{}]", meta.label);
                element.click().await?;
                Ok(format!("Clicked [{}]", meta.label))
            }
            PageAction::Fill(text) => {
                info!("Typing into [{}]", meta.label);
                element.clear().await?;
                element.send_keys(text).await?;
                Ok(format!("Filled [{}]", meta.label))
            }
            PageAction::ReadText => match meta.text_node_index {
                Some(index) => {
                    let text = self
                        .run_with_element(TEXT_NODE_SCRIPT, &element, vec![json!(index)])
                        .await?;
                    text.as_str().map(str::to_string).with_context(|| {
                        format!("Text node {} of [{}] no longer exists", index, meta.label)
                    })
                }
                None => Ok(element.text().await?),
            },
        }
    }

    async fn run_with_element(
        &self,
        script: &str,
        element: &Element,
        extra: Vec<Value>,
    ) -> Result<Value> {
        let mut args = vec![serde_json::to_value(element)?];
        args.extend(extra);
        self.client
            .execute(script, args)
            .await
            .context("Failed to execute script")
    }

    pub async fn close(self) -> Result<()> {
        debug!("Closing {:?} session", self.browser_type);
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
