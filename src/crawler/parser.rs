//! HTML parser for extracting page references
//!
//! This module handles parsing HTML content to extract:
//! - Hyperlinks (from `<a href>` tags)
//! - Embedded images (from `<img src>` tags)

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// References extracted from one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the page was served from, after redirects
    pub final_url: String,

    /// Absolute hyperlink targets, in document order, without duplicates
    pub links: Vec<String>,

    /// Absolute image sources, in document order, without duplicates
    pub images: Vec<String>,
}

/// Parses HTML content and extracts link and image references
///
/// # Extraction Rules
///
/// **Include:**
/// - `<a href="...">` targets
/// - `<img src="...">` sources
///
/// **Exclude:**
/// - empty values and fragment-only hrefs (`#top`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - anything that is not http(s) after resolution
///
/// Relative references are resolved against `base_url`. Link fragments are
/// dropped so `/page#a` and `/page#b` are the same page.
///
/// # Example
///
/// ```
/// use url_crawler::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><img src="logo.png">"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &base_url);
/// assert_eq!(page.links, vec!["https://example.com/about"]);
/// assert_eq!(page.images, vec!["https://example.com/logo.png"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> FetchedPage {
    let document = Html::parse_document(html);

    FetchedPage {
        final_url: base_url.to_string(),
        links: extract_references(&document, "a[href]", "href", base_url, true),
        images: extract_references(&document, "img[src]", "src", base_url, false),
    }
}

/// Collects one attribute from every element matching `selector`
fn extract_references(
    document: &Html,
    selector: &str,
    attribute: &str,
    base_url: &Url,
    strip_fragment: bool,
) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for element in document.select(&selector) {
        let Some(raw) = element.value().attr(attribute) else {
            continue;
        };

        if let Some(absolute) = resolve_reference(raw, base_url, strip_fragment) {
            if seen.insert(absolute.clone()) {
                references.push(absolute);
            }
        }
    }

    references
}

/// Resolves a reference to an absolute URL and validates it
///
/// Returns None if the reference should be excluded.
fn resolve_reference(raw: &str, base_url: &Url, strip_fragment: bool) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(raw).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    if strip_fragment {
        absolute.set_fragment(None);
    }

    Some(absolute.to_string())
}
