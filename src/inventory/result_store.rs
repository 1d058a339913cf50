use crate::inventory::PageRecord;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Concurrent map of visited page URL to its record
///
/// Shared by every in-flight page scrape of a level. Its key set doubles as
/// the visited set. A key, once inserted, is never overwritten or removed.
#[derive(Debug, Default)]
pub struct ResultStore {
    pages: DashMap<String, PageRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the page has already been recorded
    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Records a page; the first record for a URL wins
    ///
    /// Returns false if the URL was already present, in which case the store
    /// is left unchanged.
    pub fn insert(&self, url: &str, record: PageRecord) -> bool {
        match self.pages.entry(url.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Copies the current contents into an immutable, URL-ordered result
    pub fn snapshot(&self) -> CrawlResult {
        let pages = self
            .pages
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        CrawlResult { pages }
    }
}

/// Final inventory of a crawl: visited page URL to its record, ordered by URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrawlResult {
    pages: BTreeMap<String, PageRecord>,
}

impl CrawlResult {
    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Visited page URLs in order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageRecord)> {
        self.pages.iter().map(|(url, record)| (url.as_str(), record))
    }
}
