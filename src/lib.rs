//! # webtag
#![allow(clippy::uninlined_format_args)]
//!
//! Page-tagging engine for browser automation agents.
//!
//! A tagging pass finds everything on a page a user could act on (links,
//! buttons, form fields, and optionally standalone runs of text), marks each
//! with a small numbered badge, and returns an inventory mapping every label
//! to an XPath that locates the target again. Agents read the badges off a
//! screenshot, then act by label.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Tag a page and print the inventory
//! webtag tag "https://example.com"
//!
//! # Interactive elements only, one line per target
//! webtag tag "https://example.com" --no-leaf-text --format simple
//!
//! # Act on a tagged target
//! webtag click "https://example.com" 3
//! webtag type "https://example.com" 5 "query text"
//! webtag read "https://example.com" 7
//!
//! # Capture once, then tag without a browser
//! webtag capture "https://example.com" --output page.json
//! webtag offline page.json --plan
//! ```
//!
//! ## Library Usage
//!
//! The engine runs over the [`dom::Dom`] trait. [`dom::MemoryDom`] is the
//! in-memory implementation; live pages are captured into one, tagged, and
//! the result painted back.
//!
//! ```
//! use webtag::config::TaggingConfig;
//! use webtag::dom::{Dom, ElementSpec, Extent, MemoryDom};
//! use webtag::tagger::PageTagger;
//!
//! let mut dom = MemoryDom::html_page(Extent::new(1280.0, 800.0));
//! let body = dom.body(dom.document()).unwrap();
//! let button = dom.append_element(
//!     body,
//!     ElementSpec::new("button").attr("id", "go").rect(10.0, 10.0, 80.0, 30.0),
//! );
//! dom.append_text(button, "Go");
//!
//! let config = TaggingConfig::default();
//! let inventory = PageTagger::new(&mut dom, &config)?.tag_page(true)?;
//! assert_eq!(inventory.data[0].xpath, "//html/body/button[@id=\"go\"]");
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Visibility, interactability and role predicates
pub mod classify;

/// Element collection across the page and its iframes
pub mod collect;

/// Tagging configuration
pub mod config;

/// DOM abstraction and the in-memory implementation
pub mod dom;

/// Badge insertion and layout
pub mod layout;

/// Page metadata, visual viewport and focus
pub mod page;

/// Candidate selection and nesting reduction
pub mod select;

/// Page snapshots, badge plans and browser-side scripts
pub mod snapshot;

/// Tagging passes and cleanup hooks
pub mod tagger;

/// Inventory and CLI types
pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// XPath synthesis and resolution
pub mod xpath;

pub use config::TaggingConfig;
pub use tagger::PageTagger;
pub use types::{Inventory, OutputFormat, Role, TagMetadata, ViewportSize};
pub use webdriver::{Browser, BrowserType, PageAction};
