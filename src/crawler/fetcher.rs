//! Page fetching
//!
//! This module defines the [`PageFetcher`] seam the crawl engine calls into,
//! and its HTTP implementation:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for page content
//! - Status and Content-Type checks
//! - Handing the body to the HTML parser

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::{parse_html, FetchedPage};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one page
const MAX_REDIRECTS: usize = 10;

/// Reasons a page could not be fetched or parsed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is not HTML (content type '{content_type}')")]
    ContentMismatch { url: String, content_type: String },

    #[error("{url} redirected outside the root domain to {location}")]
    OffDomainRedirect { url: String, location: String },
}

/// Source of page references
///
/// Given a URL, returns the deduplicated links and image sources found on the
/// page, or the reason the page could not be read.
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings supplying the request and connect timeouts
///
/// # Example
///
/// ```no_run
/// use url_crawler::config::Config;
/// use url_crawler::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration
    pub fn new(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, crawler)?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        fetch_page(&self.client, url).await
    }
}

/// Fetches a URL and extracts its references
///
/// # Request Flow
///
/// 1. GET the URL, following up to 10 redirects
/// 2. Non-2xx status → `FetchError::Status`
/// 3. Content-Type that is not HTML → `FetchError::ContentMismatch`
/// 4. Parse the body, resolving references against the final URL
///
/// There is no retry: any failure is reported once and the caller decides
/// what it means for the crawl.
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !is_html(&content_type) {
        return Err(FetchError::ContentMismatch {
            url: url.to_string(),
            content_type,
        });
    }

    let final_url: Url = response.url().clone();

    let body = response
        .text()
        .await
        .map_err(|e| transport_error(url, e))?;

    Ok(parse_html(&body, &final_url))
}

fn transport_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source,
        }
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}
