//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The `PageFetcher` seam and its HTTP implementation
//! - HTML parsing and reference extraction
//! - Single-page scraping into the shared result store
//! - Level-by-level crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scraper;

pub use coordinator::{run_crawl, CrawlOptions, CrawlReport, Crawler, Termination};
pub use fetcher::{build_http_client, fetch_page, FetchError, HttpFetcher, PageFetcher};
pub use parser::{parse_html, FetchedPage};
pub use scraper::{PageScraper, ScrapeOutcome, SkipReason};
