//! Markdown report generation
//!
//! This module renders a crawl report as a markdown document: run
//! information, statistics, failed pages, and one reference table per
//! visited page.

use crate::crawler::CrawlReport;
use crate::output::stats::CrawlStatistics;

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let stats = CrawlStatistics::from_report(report);
    let mut md = String::new();

    md.push_str("# Site Inventory\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", report.root_url));
    md.push_str(&format!("- **Scope policy**: {}\n", report.scope_policy));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        stats.duration_ms as f64 / 1000.0
    ));
    md.push_str(&format!("- **Stopped**: {}\n\n", report.termination));

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages recorded | {} |\n", stats.total_pages));
    md.push_str(&format!("| Pages fetched | {} |\n", stats.pages_fetched));
    md.push_str(&format!("| Pages failed | {} |\n", stats.pages_failed));
    md.push_str(&format!("| Links | {} |\n", stats.total_links));
    md.push_str(&format!("| Images | {} |\n", stats.total_images));
    md.push_str(&format!(
        "| Off-domain images | {} |\n",
        stats.off_domain_images
    ));
    md.push_str(&format!("| Levels | {} |\n\n", stats.levels));

    if !report.failed_pages.is_empty() {
        md.push_str("## Failed Pages\n\n");
        for url in &report.failed_pages {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md.push_str("## Pages\n\n");
    for (url, record) in report.pages.iter() {
        md.push_str(&format!("### {}\n\n", url));

        if record.is_empty() {
            md.push_str("_No references recorded._\n\n");
            continue;
        }

        md.push_str("| Kind | Target |\n");
        md.push_str("|------|--------|\n");
        for reference in record.iter() {
            md.push_str(&format!(
                "| {} | {} |\n",
                reference.kind,
                escape_cell(&reference.target)
            ));
        }
        md.push('\n');
    }

    md
}

// Pipes would split the table cell
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
