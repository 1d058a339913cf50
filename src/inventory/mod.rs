//! Crawl inventory types
//!
//! - `ReferenceKind` / `PageRecord`: the references found on one page
//! - `ResultStore`: the concurrent map pages are recorded into during a crawl
//! - `CrawlResult`: the immutable inventory handed back when the crawl ends

mod page_record;
mod result_store;

pub use page_record::{PageRecord, Reference, ReferenceKind};
pub use result_store::{CrawlResult, ResultStore};
