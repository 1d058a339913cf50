//! Domain scoping for the crawl
//!
//! Decides whether a URL belongs to the root URL's domain. Two policies are
//! available:
//!
//! - [`ScopePolicy::Substring`]: the root host must contain the URL's domain
//!   token as a substring. This accepts `www.`-prefixed and bare forms of the
//!   root alike, but is permissive: with root `notexample.com`, any
//!   `*.example.*` host is accepted too.
//! - [`ScopePolicy::Strict`]: the URL host must be the root host (without a
//!   leading `www.`) or one of its subdomains.

mod domain;

pub use domain::{domain_token, extract_host};

use crate::ScopeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matching rule used to decide whether a URL is in scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScopePolicy {
    /// Root host contains the URL's domain token
    #[default]
    Substring,
    /// URL host is the root's registrable host or a subdomain of it
    Strict,
}

impl fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// The domain a crawl is confined to
#[derive(Debug, Clone)]
pub struct DomainScope {
    root_host: String,
    base_host: String,
    policy: ScopePolicy,
}

impl DomainScope {
    /// Creates a scope from the crawl's root URL
    ///
    /// Fails if the root URL cannot be parsed or has no host.
    pub fn new(root_url: &str, policy: ScopePolicy) -> Result<Self, ScopeError> {
        let root_host = extract_host(root_url)?;
        let base_host = root_host
            .strip_prefix("www.")
            .unwrap_or(&root_host)
            .to_string();

        Ok(Self {
            root_host,
            base_host,
            policy,
        })
    }

    /// The lowercase host of the root URL
    pub fn root_host(&self) -> &str {
        &self.root_host
    }

    /// The active matching policy
    pub fn policy(&self) -> ScopePolicy {
        self.policy
    }

    /// Checks a URL against the scope
    ///
    /// Returns the reason the URL is out of scope, if it is.
    pub fn check(&self, url: &str) -> Result<(), ScopeError> {
        let token = domain_token(url)?;

        let accepted = match self.policy {
            ScopePolicy::Substring => self.root_host.contains(&token),
            ScopePolicy::Strict => {
                let host = extract_host(url)?;
                domain::is_same_or_subdomain(&host, &self.base_host)
            }
        };

        if accepted {
            Ok(())
        } else {
            Err(ScopeError::OffDomain {
                url: url.to_string(),
                token,
            })
        }
    }

    /// Returns true if the URL is in scope; unparseable URLs are not
    pub fn in_scope(&self, url: &str) -> bool {
        self.check(url).is_ok()
    }
}
