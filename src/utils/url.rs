// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use campus_events::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://history.example.edu/events", "/events/talk-1"),
///     Some("https://history.example.edu/events/talk-1".to_string())
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

/// Extract the host from a URL string, lowercased.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// Whether two URLs belong to the same host family.
///
/// Exact host match, or both hosts share the same trailing two labels
/// ("history.example.edu" and "www.example.edu" both end in "example.edu").
pub fn same_host_family(a: &str, b: &str) -> bool {
    let (Some(host_a), Some(host_b)) = (get_domain(a), get_domain(b)) else {
        return false;
    };
    if host_a == host_b {
        return true;
    }
    match (root_domain(&host_a), root_domain(&host_b)) {
        (Some(ra), Some(rb)) => ra == rb,
        _ => false,
    }
}

/// Last two labels of a hostname ("events.cs.example.edu" -> "example.edu").
fn root_domain(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2..].join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve("https://example.edu/events", "https://other.edu/page"),
            Some("https://other.edu/page".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_path() {
        assert_eq!(
            resolve("https://example.edu/news/events", "/events/talk"),
            Some("https://example.edu/events/talk".to_string())
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve("https://example.edu/events/", "talk.html"),
            Some("https://example.edu/events/talk.html".to_string())
        );
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://Example.EDU/path"),
            Some("example.edu".to_string())
        );
        assert_eq!(get_domain("not a url"), None);
    }

    #[test]
    fn test_same_host_family() {
        assert!(same_host_family(
            "https://history.example.edu/events/1",
            "https://history.example.edu"
        ));
        assert!(same_host_family(
            "https://www.example.edu/events/1",
            "https://history.example.edu"
        ));
        assert!(!same_host_family(
            "https://example.edu/x",
            "https://other.edu/y"
        ));
    }
}
