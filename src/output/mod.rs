//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering the inventory as plain text, markdown, or JSON
//! - Writing the rendered report to a file or stdout
//! - Summarizing a crawl as statistics

mod markdown;
pub mod stats;
mod text;

pub use markdown::format_markdown_report;
pub use stats::{format_statistics, CrawlStatistics};
pub use text::format_text_report;

use crate::crawler::CrawlReport;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while presenting a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Presentation format of the inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Page:` blocks with one `KIND : target` line per reference
    #[default]
    Text,
    Markdown,
    /// The full crawl report, pretty-printed
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Renders a report in the requested format
pub fn render_report(report: &CrawlReport, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Text => Ok(format_text_report(report)),
        OutputFormat::Markdown => Ok(format_markdown_report(report)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Renders a report and writes it to `path`, or to stdout when `path` is None
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `format` - Presentation format
/// * `path` - Destination file; created or truncated
pub fn write_report(
    report: &CrawlReport,
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = render_report(report, format)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            tracing::info!("Wrote {} report to {}", format, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
