#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webtag::config::TaggingConfig;
use webtag::types::OutputFormat;
use webtag::webdriver::PageAction;

mod commands;
mod errors;

use commands::utils::BrowserArgs;

// Exit codes
const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "webtag")]
#[command(about = "Tag the interactive elements of a web page with numbered badges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tagging configuration file (defaults to ~/.webtag/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag a page and print the inventory
    Tag {
        /// URL to tag
        url: String,

        /// Only tag interactive elements, not standalone text
        #[arg(long)]
        no_leaf_text: bool,

        /// Hide everything except the badges after tagging
        #[arg(long)]
        hide_others: bool,

        /// Include page metadata, visual viewport and focused target in JSON output
        #[arg(long)]
        page_info: bool,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Write the inventory to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Tag a page and click the target with the given label
    Click {
        url: String,

        label: String,

        #[arg(long)]
        no_leaf_text: bool,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Tag a page and type text into the target with the given label
    Type {
        url: String,

        label: String,

        /// Text to type; the field is cleared first
        text: String,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Tag a page and print the text of the target with the given label
    Read {
        url: String,

        label: String,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Tag a page and scroll the target with the given label into view
    Scroll {
        url: String,

        label: String,

        #[arg(long)]
        no_leaf_text: bool,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Save a JSON snapshot of a page for offline tagging
    Capture {
        url: String,

        /// Write the snapshot to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Tag a saved snapshot without a browser
    Offline {
        /// Snapshot file written by `capture`
        snapshot: PathBuf,

        #[arg(long)]
        no_leaf_text: bool,

        /// Include the badge placements in JSON output
        #[arg(long)]
        plan: bool,

        /// Include page metadata, visual viewport and focused target in JSON output
        #[arg(long)]
        page_info: bool,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Convert to our error type to get proper exit code
            let webtag_err: errors::WebtagError = err.into();

            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "kind": webtag_err.kind(),
                "message": webtag_err.to_string(),
                "exit_code": webtag_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", webtag_err);
            std::process::exit(webtag_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webtag=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();
    let config = TaggingConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Tag {
            url,
            no_leaf_text,
            hide_others,
            page_info,
            format,
            output,
            browser,
        } => {
            commands::tag::handle_tag(
                url,
                no_leaf_text,
                hide_others,
                page_info,
                format,
                output,
                browser,
                config,
            )
            .await?
        }

        Commands::Click {
            url,
            label,
            no_leaf_text,
            browser,
        } => {
            commands::act::handle_action(url, label, PageAction::Click, no_leaf_text, browser, config)
                .await?
        }

        Commands::Type {
            url,
            label,
            text,
            browser,
        } => {
            commands::act::handle_action(url, label, PageAction::Fill(text), false, browser, config)
                .await?
        }

        Commands::Read {
            url,
            label,
            browser,
        } => {
            commands::act::handle_action(url, label, PageAction::ReadText, false, browser, config)
                .await?
        }

        Commands::Scroll {
            url,
            label,
            no_leaf_text,
            browser,
        } => {
            commands::act::handle_action(
                url,
                label,
                PageAction::ScrollIntoView,
                no_leaf_text,
                browser,
                config,
            )
            .await?
        }

        Commands::Capture {
            url,
            output,
            browser,
        } => commands::capture::handle_capture(url, output, browser, config).await?,

        Commands::Offline {
            snapshot,
            no_leaf_text,
            plan,
            page_info,
            format,
            output,
        } => commands::offline::handle_offline(
            snapshot,
            no_leaf_text,
            plan,
            page_info,
            format,
            output,
            config,
        )?,
    }

    Ok(())
}
