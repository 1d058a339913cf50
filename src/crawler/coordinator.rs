//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop:
//! - Seeding the frontier with the root URL
//! - Dispatching one scrape task per frontier URL, bounded by a semaphore
//! - Joining every task of a level before the next level starts
//! - Building the next frontier from the level's in-scope links
//! - Stopping when the frontier is exhausted, the depth limit is reached,
//!   or the run is cancelled

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::scraper::{PageScraper, ScrapeOutcome, SkipReason};
use crate::inventory::{CrawlResult, ResultStore};
use crate::scope::{DomainScope, ScopePolicy};
use crate::{CrawlError, ScopeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Engine settings derived from [`CrawlerConfig`]
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Maximum number of page scrapes in flight at once
    pub max_concurrency: usize,
    /// Number of levels to crawl; `None` crawls until the frontier is empty
    pub max_depth: Option<u32>,
    pub scope_policy: ScopePolicy,
    pub record_off_domain_links: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrent_pages_open.max(1) as usize,
            max_depth: (config.max_depth > 0).then_some(config.max_depth),
            scope_policy: config.scope_policy,
            record_off_domain_links: config.record_off_domain_links,
        }
    }
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// No unvisited in-scope links remained
    Exhausted,
    /// The configured number of levels was crawled
    DepthLimit,
    /// The run was cancelled between levels
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "frontier exhausted"),
            Self::DepthLimit => write!(f, "depth limit reached"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub root_url: String,
    /// Policy the crawl was scoped with
    pub scope_policy: ScopePolicy,
    /// Visited page URL → references found on it
    pub pages: CrawlResult,
    /// Number of levels whose scrapes were dispatched
    pub levels: u32,
    /// Pages whose fetch failed (recorded with an empty record)
    pub failed_pages: BTreeSet<String>,
    pub skipped_duplicates: usize,
    pub skipped_out_of_scope: usize,
    pub termination: Termination,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Running tallies for one crawl
#[derive(Debug, Default)]
struct LevelTally {
    failed_pages: BTreeSet<String>,
    skipped_duplicates: usize,
    skipped_out_of_scope: usize,
}

/// Breadth-first crawler confined to the root URL's domain
pub struct Crawler<F> {
    root_url: String,
    scope: Arc<DomainScope>,
    fetcher: Arc<F>,
    options: CrawlOptions,
}

impl<F: PageFetcher> Crawler<F> {
    /// Creates a crawler for `root_url`
    ///
    /// The root is normalized the way discovered links are (`https://a.com`
    /// becomes `https://a.com/`, fragments dropped) so a link back to it is
    /// recognized as already visited. Fails if the root URL has no usable
    /// host to scope the crawl to.
    pub fn new(root_url: &str, fetcher: F, options: CrawlOptions) -> Result<Self, CrawlError> {
        let scope = DomainScope::new(root_url, options.scope_policy)?;
        let root_url = normalize_root(root_url)?;

        Ok(Self {
            root_url,
            scope: Arc::new(scope),
            fetcher: Arc::new(fetcher),
            options,
        })
    }

    /// Crawls until the frontier is exhausted or the depth limit is reached
    pub async fn crawl(&self) -> CrawlReport {
        self.crawl_until_cancelled(CancellationToken::new()).await
    }

    /// Crawls, checking `cancel` between levels
    ///
    /// A level that has started always runs to completion, so a cancelled
    /// crawl still returns every page recorded so far.
    pub async fn crawl_until_cancelled(&self, cancel: CancellationToken) -> CrawlReport {
        let started_at = Utc::now();
        let store = Arc::new(ResultStore::new());
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency));
        let mut tally = LevelTally::default();

        let mut frontier: BTreeSet<String> = BTreeSet::from([self.root_url.clone()]);
        let mut levels: u32 = 0;

        tracing::info!(
            "Starting crawl of {} (scope: {}, policy: {})",
            self.root_url,
            self.scope.root_host(),
            self.scope.policy()
        );

        let termination = loop {
            if frontier.is_empty() {
                break Termination::Exhausted;
            }
            if cancel.is_cancelled() {
                tracing::info!("Crawl cancelled before level {}", levels + 1);
                break Termination::Cancelled;
            }
            if self.options.max_depth.is_some_and(|max| levels >= max) {
                tracing::info!(
                    "Depth limit of {} reached with {} URLs left in the frontier",
                    levels,
                    frontier.len()
                );
                break Termination::DepthLimit;
            }

            levels += 1;
            tracing::info!("Level {}: scraping {} URLs", levels, frontier.len());

            let discovered = self
                .run_level(&frontier, &store, &semaphore, &mut tally)
                .await;

            // Already-recorded pages would only be skipped as duplicates
            frontier = discovered
                .into_iter()
                .filter(|url| !store.contains(url))
                .collect();

            tracing::info!(
                "Level {} complete: {} pages recorded, {} new URLs queued",
                levels,
                store.len(),
                frontier.len()
            );
        };

        let pages = store.snapshot();
        tracing::info!(
            "Crawl finished ({}): {} pages over {} levels",
            termination,
            pages.len(),
            levels
        );

        CrawlReport {
            root_url: self.root_url.clone(),
            scope_policy: self.scope.policy(),
            pages,
            levels,
            failed_pages: tally.failed_pages,
            skipped_duplicates: tally.skipped_duplicates,
            skipped_out_of_scope: tally.skipped_out_of_scope,
            termination,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Scrapes every URL of one level concurrently and joins them all
    ///
    /// Returns the distinct union of the in-scope links the level found.
    async fn run_level(
        &self,
        frontier: &BTreeSet<String>,
        store: &Arc<ResultStore>,
        semaphore: &Arc<Semaphore>,
        tally: &mut LevelTally,
    ) -> BTreeSet<String> {
        let mut tasks = JoinSet::new();

        for url in frontier {
            let url = url.clone();
            let scope = Arc::clone(&self.scope);
            let fetcher = Arc::clone(&self.fetcher);
            let store = Arc::clone(store);
            let semaphore = Arc::clone(semaphore);
            let record_off_domain_links = self.options.record_off_domain_links;

            tasks.spawn(async move {
                // The semaphore is never closed, so acquire only fails if it is
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = PageScraper::new(&scope, fetcher.as_ref(), &store)
                    .record_off_domain_links(record_off_domain_links)
                    .scrape(&url)
                    .await;
                (url, outcome)
            });
        }

        let mut discovered = BTreeSet::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, ScrapeOutcome::Scraped { links, .. })) => discovered.extend(links),
                Ok((url, ScrapeOutcome::Failed { .. })) => {
                    tally.failed_pages.insert(url);
                }
                Ok((_, ScrapeOutcome::Skipped(SkipReason::Duplicate))) => {
                    tally.skipped_duplicates += 1;
                }
                Ok((_, ScrapeOutcome::Skipped(SkipReason::OutOfScope(_)))) => {
                    tally.skipped_out_of_scope += 1;
                }
                Err(e) => tracing::error!("Scrape task failed: {}", e),
            }
        }

        discovered
    }
}

fn normalize_root(root_url: &str) -> Result<String, ScopeError> {
    let mut url = Url::parse(root_url).map_err(|source| ScopeError::Unparseable {
        url: root_url.to_string(),
        source,
    })?;
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Runs a complete crawl from configuration over HTTP
///
/// # Example
///
/// ```no_run
/// use url_crawler::config::Config;
/// use url_crawler::crawler::run_crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), url_crawler::CrawlError> {
/// let report = run_crawl(&Config::default(), CancellationToken::new()).await?;
/// println!("{} pages", report.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlReport, CrawlError> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)?;
    let crawler = Crawler::new(
        &config.crawler.root_url,
        fetcher,
        CrawlOptions::from(&config.crawler),
    )?;
    Ok(crawler.crawl_until_cancelled(cancel).await)
}
