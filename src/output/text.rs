//! Plain-text inventory listing
//!
//! One block per visited page, pages in URL order and references in the
//! order they were found:
//!
//! ```text
//! Page: https://example.com/
//!    LINK : https://example.com/about
//!    IMG : https://example.com/logo.png
//! ```

use crate::crawler::CrawlReport;

/// Formats the inventory as plain text
pub fn format_text_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    for (url, record) in report.pages.iter() {
        out.push_str(&format!("Page: {}\n", url));
        for reference in record.iter() {
            out.push_str(&format!("   {} : {}\n", reference.kind, reference.target));
        }
    }

    out
}
