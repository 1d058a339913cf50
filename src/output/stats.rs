//! Statistics derived from a finished crawl
//!
//! This module reduces a [`CrawlReport`] to summary counts and formats them
//! for display.

use crate::crawler::{CrawlReport, Termination};
use crate::inventory::ReferenceKind;
use crate::scope::DomainScope;
use std::collections::BTreeSet;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Number of pages in the inventory
    pub total_pages: u64,

    /// Pages that were fetched successfully
    pub pages_fetched: u64,

    /// Pages whose fetch failed
    pub pages_failed: u64,

    /// Link references across all pages
    pub total_links: u64,

    /// Image references across all pages
    pub total_images: u64,

    /// Distinct image URLs hosted outside the crawl's domain
    pub off_domain_images: u64,

    /// Levels dispatched
    pub levels: u32,

    /// Wall-clock duration of the crawl in milliseconds
    pub duration_ms: i64,

    pub termination: Termination,
}

impl CrawlStatistics {
    /// Computes statistics for a report
    pub fn from_report(report: &CrawlReport) -> Self {
        let scope = DomainScope::new(&report.root_url, report.scope_policy).ok();

        let mut total_links = 0u64;
        let mut total_images = 0u64;
        let mut off_domain_images = BTreeSet::new();

        for (_, record) in report.pages.iter() {
            total_links += record.count(ReferenceKind::Link) as u64;
            total_images += record.count(ReferenceKind::Image) as u64;

            for image in record.targets(ReferenceKind::Image) {
                let in_scope = scope.as_ref().is_some_and(|s| s.in_scope(image));
                if !in_scope {
                    off_domain_images.insert(image);
                }
            }
        }

        let total_pages = report.pages.len() as u64;
        let pages_failed = report.failed_pages.len() as u64;

        Self {
            total_pages,
            pages_fetched: total_pages.saturating_sub(pages_failed),
            pages_failed,
            total_links,
            total_images,
            off_domain_images: off_domain_images.len() as u64,
            levels: report.levels,
            duration_ms: (report.finished_at - report.started_at).num_milliseconds(),
            termination: report.termination,
        }
    }

    /// Share of recorded pages that were fetched successfully, in percent
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / self.total_pages as f64) * 100.0
    }
}

/// Formats statistics as plain text
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n");
    out.push_str(&format!("  Pages recorded: {}\n", stats.total_pages));
    out.push_str(&format!(
        "  Pages fetched: {} ({:.1}%)\n",
        stats.pages_fetched,
        stats.success_rate()
    ));
    out.push_str(&format!("  Pages failed: {}\n", stats.pages_failed));
    out.push_str(&format!("  Links found: {}\n", stats.total_links));
    out.push_str(&format!(
        "  Images found: {} ({} off-domain)\n",
        stats.total_images, stats.off_domain_images
    ));
    out.push_str(&format!("  Levels: {}\n", stats.levels));
    out.push_str(&format!(
        "  Duration: {:.2}s\n",
        stats.duration_ms as f64 / 1000.0
    ));
    out.push_str(&format!("  Stopped: {}\n", stats.termination));

    out
}
