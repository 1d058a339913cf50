//! Single-page scraping
//!
//! Scrapes one URL: skips pages already recorded or out of scope, fetches the
//! page, classifies its references, records the page, and hands back the
//! in-scope links that are candidates for the next level.

use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::inventory::{PageRecord, ReferenceKind, ResultStore};
use crate::scope::DomainScope;
use crate::ScopeError;

/// Why a URL was not scraped
#[derive(Debug)]
pub enum SkipReason {
    /// The page is already in the result store
    Duplicate,
    /// The page is not in the root domain, or its URL is unusable
    OutOfScope(ScopeError),
}

/// Result of scraping one URL
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// The page was fetched and recorded
    Scraped {
        record: PageRecord,
        /// Distinct in-scope link targets found on the page
        links: Vec<String>,
    },
    /// The fetch failed; an empty record was stored for the page
    Failed {
        record: PageRecord,
        error: FetchError,
    },
    /// Nothing was fetched or recorded
    Skipped(SkipReason),
}

impl ScrapeOutcome {
    /// Links eligible for the next level; empty unless the page was scraped
    pub fn links(&self) -> &[String] {
        match self {
            Self::Scraped { links, .. } => links,
            _ => &[],
        }
    }
}

/// Scrapes pages into a shared [`ResultStore`]
pub struct PageScraper<'a, F> {
    scope: &'a DomainScope,
    fetcher: &'a F,
    store: &'a ResultStore,
    record_off_domain_links: bool,
}

impl<'a, F: PageFetcher> PageScraper<'a, F> {
    pub fn new(scope: &'a DomainScope, fetcher: &'a F, store: &'a ResultStore) -> Self {
        Self {
            scope,
            fetcher,
            store,
            record_off_domain_links: false,
        }
    }

    /// Keep off-domain links in page records instead of dropping them
    pub fn record_off_domain_links(mut self, enabled: bool) -> Self {
        self.record_off_domain_links = enabled;
        self
    }

    /// Scrapes a single URL
    ///
    /// 1. Already recorded → `Skipped(Duplicate)`
    /// 2. Out of scope → `Skipped(OutOfScope)`
    /// 3. Fetch failure, or a redirect that left the domain → an empty
    ///    record is stored, `Failed`
    /// 4. Otherwise links (in scope only) then images (any domain) are
    ///    recorded, the record is stored, and the in-scope links returned
    pub async fn scrape(&self, url: &str) -> ScrapeOutcome {
        if self.store.contains(url) {
            tracing::trace!("Skipping {}: already recorded", url);
            return ScrapeOutcome::Skipped(SkipReason::Duplicate);
        }

        if let Err(e) = self.scope.check(url) {
            tracing::debug!("Skipping {}: {}", url, e);
            return ScrapeOutcome::Skipped(SkipReason::OutOfScope(e));
        }

        let fetched = self.fetcher.fetch(url).await.and_then(|page| {
            if self.scope.in_scope(&page.final_url) {
                Ok(page)
            } else {
                Err(FetchError::OffDomainRedirect {
                    url: url.to_string(),
                    location: page.final_url,
                })
            }
        });

        let page = match fetched {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                let record = PageRecord::new();
                self.store.insert(url, record.clone());
                return ScrapeOutcome::Failed { record, error };
            }
        };

        let mut record = PageRecord::new();
        let mut links = Vec::new();

        for link in page.links {
            if self.scope.in_scope(&link) {
                if record.insert(link.clone(), ReferenceKind::Link) {
                    links.push(link);
                }
            } else if self.record_off_domain_links {
                record.insert(link, ReferenceKind::Link);
            }
        }

        for image in page.images {
            record.insert(image, ReferenceKind::Image);
        }

        if !self.store.insert(url, record.clone()) {
            // Only reachable if the same URL was dispatched twice in one level
            tracing::warn!("{} was recorded concurrently; keeping the first record", url);
            return ScrapeOutcome::Skipped(SkipReason::Duplicate);
        }

        tracing::debug!(
            "Scraped {}: {} links ({} in scope), {} images",
            url,
            record.count(ReferenceKind::Link),
            links.len(),
            record.count(ReferenceKind::Image)
        );
        for reference in record.iter() {
            tracing::debug!("   {} : {}", reference.kind, reference.target);
        }

        ScrapeOutcome::Scraped { record, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::parser::FetchedPage;
    use crate::scope::ScopePolicy;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory site; URLs not in the map fail with HTTP 404
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, FetchedPage>,
        calls: AtomicUsize,
    }

    impl FakeSite {
        fn page(mut self, url: &str, links: &[&str], images: &[&str]) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    final_url: url.to_string(),
                    links: links.iter().map(|s| s.to_string()).collect(),
                    images: images.iter().map(|s| s.to_string()).collect(),
                },
            );
            self
        }

        /// Serves `url` as if it had redirected to `location`
        fn redirect(mut self, url: &str, location: &str, images: &[&str]) -> Self {
            self = self.page(url, &[], images);
            if let Some(page) = self.pages.get_mut(url) {
                page.final_url = location.to_string();
            }
            self
        }
    }

    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn scope() -> DomainScope {
        DomainScope::new("https://www.example.com/", ScopePolicy::Substring).unwrap()
    }

    #[tokio::test]
    async fn test_scrape_classifies_and_filters() {
        let site = FakeSite::default().page(
            "https://www.example.com/",
            &[
                "https://www.example.com/about",
                "http://other.example/x",
                "https://www.example.com/contact",
            ],
            &["http://cdn.example/pic.png", "https://www.example.com/logo.png"],
        );
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        let outcome = scraper.scrape("https://www.example.com/").await;
        let ScrapeOutcome::Scraped { record, links } = outcome else {
            panic!("expected a scraped page");
        };

        assert_eq!(
            links,
            vec![
                "https://www.example.com/about",
                "https://www.example.com/contact"
            ]
        );
        assert_eq!(
            record.get("https://www.example.com/about"),
            Some(ReferenceKind::Link)
        );
        assert!(!record.contains("http://other.example/x"));
        assert_eq!(
            record.get("http://cdn.example/pic.png"),
            Some(ReferenceKind::Image)
        );
        assert_eq!(record.len(), 4);
        assert!(store.contains("https://www.example.com/"));
    }

    #[tokio::test]
    async fn test_off_domain_links_recorded_when_enabled() {
        let site = FakeSite::default().page(
            "https://www.example.com/",
            &["https://www.example.com/b", "http://other.example/x"],
            &[],
        );
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store).record_off_domain_links(true);

        let outcome = scraper.scrape("https://www.example.com/").await;
        let ScrapeOutcome::Scraped { record, links } = outcome else {
            panic!("expected a scraped page");
        };

        assert_eq!(record.get("http://other.example/x"), Some(ReferenceKind::Link));
        assert_eq!(links, vec!["https://www.example.com/b"]);
    }

    #[tokio::test]
    async fn test_link_wins_over_image_for_same_target() {
        let site = FakeSite::default().page(
            "https://www.example.com/",
            &["https://www.example.com/banner.png"],
            &["https://www.example.com/banner.png"],
        );
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        let outcome = scraper.scrape("https://www.example.com/").await;
        let ScrapeOutcome::Scraped { record, .. } = outcome else {
            panic!("expected a scraped page");
        };
        assert_eq!(record.len(), 1);
        assert_eq!(
            record.get("https://www.example.com/banner.png"),
            Some(ReferenceKind::Link)
        );
    }

    #[tokio::test]
    async fn test_duplicate_is_skipped_without_fetch() {
        let site = FakeSite::default().page("https://www.example.com/", &[], &[]);
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        assert!(matches!(
            scraper.scrape("https://www.example.com/").await,
            ScrapeOutcome::Scraped { .. }
        ));
        assert!(matches!(
            scraper.scrape("https://www.example.com/").await,
            ScrapeOutcome::Skipped(SkipReason::Duplicate)
        ));
        assert_eq!(site.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_out_of_scope_is_skipped_without_record() {
        let site = FakeSite::default();
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        let outcome = scraper.scrape("http://other.example/x").await;
        assert!(matches!(
            outcome,
            ScrapeOutcome::Skipped(SkipReason::OutOfScope(ScopeError::OffDomain { .. }))
        ));

        let outcome = scraper.scrape("not a url").await;
        assert!(matches!(
            outcome,
            ScrapeOutcome::Skipped(SkipReason::OutOfScope(ScopeError::Unparseable { .. }))
        ));

        assert!(store.is_empty());
        assert_eq!(site.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_redirect_off_domain_records_empty_page() {
        let site = FakeSite::default().redirect(
            "https://www.example.com/out",
            "http://other.example/landing",
            &["http://other.example/banner.png"],
        );
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        let outcome = scraper.scrape("https://www.example.com/out").await;
        match &outcome {
            ScrapeOutcome::Failed { record, error } => {
                assert!(record.is_empty());
                assert!(matches!(error, FetchError::OffDomainRedirect { .. }));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(store.contains("https://www.example.com/out"));
    }

    #[tokio::test]
    async fn test_redirect_within_domain_is_scraped() {
        let site = FakeSite::default().redirect(
            "https://www.example.com/old",
            "https://example.com/new",
            &["https://example.com/new.png"],
        );
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        let outcome = scraper.scrape("https://www.example.com/old").await;
        let ScrapeOutcome::Scraped { record, .. } = outcome else {
            panic!("expected a scraped page");
        };
        assert_eq!(
            record.get("https://example.com/new.png"),
            Some(ReferenceKind::Image)
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_records_empty_page() {
        let site = FakeSite::default();
        let store = ResultStore::new();
        let scope = scope();
        let scraper = PageScraper::new(&scope, &site, &store);

        let outcome = scraper.scrape("https://www.example.com/missing").await;
        match &outcome {
            ScrapeOutcome::Failed { record, error } => {
                assert!(record.is_empty());
                assert!(matches!(error, FetchError::Status { status: 404, .. }));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(outcome.links().is_empty());
        assert!(store.contains("https://www.example.com/missing"));
    }
}
