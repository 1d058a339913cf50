use crate::ScopeError;
use url::Url;

/// Parses a URL string, mapping failures into [`ScopeError`]
pub(crate) fn parse_url(url: &str) -> Result<Url, ScopeError> {
    Url::parse(url).map_err(|source| ScopeError::Unparseable {
        url: url.to_string(),
        source,
    })
}

/// Extracts the lowercase host of a URL
///
/// The port is not part of the host, so `http://example.com:8080/` yields
/// `example.com`. Hosts with an empty label (`a..b.com`, `.b.com`) are
/// rejected; a single trailing dot is allowed.
pub fn extract_host(url: &str) -> Result<String, ScopeError> {
    let parsed = parse_url(url)?;
    let host = parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(|| ScopeError::MissingHost {
            url: url.to_string(),
        })?;

    if host.strip_suffix('.').unwrap_or(&host).split('.').any(str::is_empty) {
        return Err(ScopeError::EmptyHostLabel {
            url: url.to_string(),
            host,
        });
    }

    Ok(host)
}

/// Extracts the comparable domain token of a URL
///
/// If the host has more than two dot-separated labels, the token is the
/// second label from the left, which strips a single subdomain level.
/// Otherwise the whole host is the token.
///
/// # Examples
///
/// ```
/// use url_crawler::scope::domain_token;
///
/// assert_eq!(domain_token("https://www.example.com/a").unwrap(), "example");
/// assert_eq!(domain_token("https://example.com/a").unwrap(), "example.com");
/// assert!(domain_token("not a url").is_err());
/// ```
pub fn domain_token(url: &str) -> Result<String, ScopeError> {
    let host = extract_host(url)?;
    let labels: Vec<&str> = host.split('.').collect();

    if labels.len() > 2 {
        Ok(labels[1].to_string())
    } else {
        Ok(host)
    }
}

/// Returns true if `host` is `base` or one of its subdomains
pub(crate) fn is_same_or_subdomain(host: &str, base: &str) -> bool {
    host == base
        || host
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
