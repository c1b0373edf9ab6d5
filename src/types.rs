use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Coarse classification of a tagged target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standalone text run
    Text,
    /// Field that accepts typed text
    Input,
    /// Anything else that can be activated
    Clickable,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Text => write!(f, "text"),
            Role::Input => write!(f, "input"),
            Role::Clickable => write!(f, "clickable"),
        }
    }
}

/// One tagged target of a tagging pass
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMetadata {
    /// Absolute path of the owning element, prefixed with `iframe[N]` for
    /// frame content
    pub xpath: String,
    /// Accessible name, absent when none was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// 1-based position among the element's text-node children when the tag
    /// marks a text run rather than the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_node_index: Option<u32>,
    /// Numeric label, dense from 0 within one pass
    pub label: String,
    pub role: Role,
}

/// Ordered result of a tagging pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Inventory {
    pub data: Vec<TagMetadata>,
}

impl Inventory {
    /// Flatten a label → metadata map in ascending label order
    pub fn from_map(map: BTreeMap<u32, TagMetadata>) -> Self {
        Inventory {
            data: map.into_values().collect(),
        }
    }

    /// Decode the JSON returned by a tagging pass.
    ///
    /// A payload that does not deserialize is a caller contract violation.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| anyhow::anyhow!("Malformed tag inventory: {}", e))
    }

    pub fn find(&self, label: &str) -> Option<&TagMetadata> {
        self.data.iter().find(|meta| meta.label == label)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One line per entry, for the simple output format
    pub fn to_lines(&self) -> Vec<String> {
        self.data
            .iter()
            .map(|meta| {
                let mut line = format!("[{}] {} {}", meta.label, meta.role, meta.xpath);
                if let Some(index) = meta.text_node_index {
                    line.push_str(&format!(" (text {})", index));
                }
                if let Some(name) = &meta.aria_label {
                    line.push_str(&format!(" \"{}\"", name));
                }
                line
            })
            .collect()
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)");
        }

        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
