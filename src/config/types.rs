use crate::output::OutputFormat;
use crate::scope::ScopePolicy;
use serde::Deserialize;

/// Root URL crawled when neither the command line nor the config names one
pub const DEFAULT_ROOT_URL: &str = "https://wiprodigital.com";

/// Main configuration structure for url-crawler
///
/// Every section is optional; missing sections and keys fall back to their
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URL the crawl starts from; also defines the crawl's domain
    pub root_url: String,

    /// Maximum number of page scrapes in flight within one level
    pub max_concurrent_pages_open: u32,

    /// Number of levels to crawl (0 = until the frontier is exhausted)
    pub max_depth: u32,

    /// Total time allowed for one page request (seconds)
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    pub connect_timeout_secs: u64,

    /// How URLs are matched against the root domain
    pub scope_policy: ScopePolicy,

    /// Keep off-domain links in page records (they are never crawled)
    pub record_off_domain_links: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            max_concurrent_pages_open: 16,
            max_depth: 0,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            scope_policy: ScopePolicy::Substring,
            record_off_domain_links: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version` or `Name/Version (+ContactURL)`.
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Presentation format of the inventory
    pub format: OutputFormat,

    /// File the inventory is written to (stdout when absent)
    pub path: Option<String>,
}
