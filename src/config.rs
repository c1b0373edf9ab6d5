//! Tunable tagging policy, loaded from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use scraper::Selector;
use tracing::{debug, info};

/// Descendant candidates an interactable element may absorb
pub const NESTING_ABSORB_LIMIT: usize = 2;
/// Distance in px past which an inline badge counts as misplaced
pub const MISALIGNMENT_THRESHOLD_PX: f64 = 250.0;
/// Floor for badge font sizes
pub const MIN_FONT_SIZE_PX: f64 = 11.0;
/// Font size decrement used while separating colliding badges
pub const FONT_STEP_PX: f64 = 0.5;
/// Levels of nested iframes that are collected
pub const MAX_FRAME_DEPTH: usize = 1;

/// Selectors for map widgets that are suppressed while tagging. The page
/// matches them when it is captured.
pub const DEFAULT_MAP_SELECTORS: &[&str] = &[
    r#"iframe[src*="google.com/maps"]"#,
    r#"iframe[id*="gmap_canvas"]"#,
    ".maplibregl-map",
    ".mapboxgl-map",
    ".leaflet-container",
    r#"img[src*="maps.googleapis.com"]"#,
    r#"[aria-label="Map"]"#,
    ".cmp-location-map__map",
    r#".map-view[data-role="mapView"]"#,
    ".google_Map-wrapper",
    ".google_map-wrapper",
    ".googleMap-wrapper",
    ".googlemap-wrapper",
    ".ls-map-canvas",
    ".gmapcluster",
    "#googleMap",
    "#googleMaps",
    "#googlemaps",
    "#googlemap",
    "#google_map",
    "#google_maps",
    "#MapId",
    ".geolocation-map-wrapper",
    ".locatorMap",
];

/// How `ariaLabel` is filled in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AriaNameMode {
    /// The `aria-label` attribute only
    #[default]
    Attribute,
    /// aria-labelledby, aria-label, `<label>`, alt, title, then inner text
    Approximate,
}

/// Heuristic thresholds and lists used by a tagging pass
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Tag standalone text runs as well as interactive elements
    pub include_leaf_text: bool,
    pub nesting_absorb_limit: usize,
    pub misalignment_threshold_px: f64,
    pub min_font_size_px: f64,
    pub font_step_px: f64,
    /// 0 ignores iframes entirely, 1 collects top-level iframes only
    pub max_frame_depth: usize,
    pub aria_name: AriaNameMode,
    pub map_selectors: Vec<String>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            include_leaf_text: true,
            nesting_absorb_limit: NESTING_ABSORB_LIMIT,
            misalignment_threshold_px: MISALIGNMENT_THRESHOLD_PX,
            min_font_size_px: MIN_FONT_SIZE_PX,
            font_step_px: FONT_STEP_PX,
            max_frame_depth: MAX_FRAME_DEPTH,
            aria_name: AriaNameMode::default(),
            map_selectors: DEFAULT_MAP_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TaggingConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: TaggingConfig =
            toml::from_str(content).context("Invalid tagging configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from `~/.webtag/config.toml` when it exists,
    /// falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No configuration file, using defaults");
                    return Ok(TaggingConfig::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = TaggingConfig::from_toml(&content)?;
        info!("Loaded tagging configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.font_step_px <= 0.0 {
            anyhow::bail!("font_step_px must be positive");
        }
        if self.min_font_size_px <= 0.0 {
            anyhow::bail!("min_font_size_px must be positive");
        }
        for selector in &self.map_selectors {
            Selector::parse(selector)
                .map_err(|e| anyhow::anyhow!("Invalid map selector '{}': {:?}", selector, e))?;
        }
        Ok(())
    }

    /// `map_selectors` as one selector group for `querySelectorAll`
    pub fn map_selector_group(&self) -> String {
        self.map_selectors.join(", ")
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".webtag").join("config.toml"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
