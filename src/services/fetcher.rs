//! HTTP fetching with bot-challenge detection.
//!
//! Department sites sit behind bot-mitigation layers that serve an
//! interstitial challenge page instead of content. A plain client cannot
//! solve those, so the fetcher detects them and surfaces a distinct
//! error class; callers skip the source or fall back rather than parse a
//! challenge page as if it were a listing.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, UPGRADE_INSECURE_REQUESTS};

use crate::error::{AppError, Result};
use crate::models::{FetchConfig, RawDocument};

/// Body markers of well-known challenge interstitials, matched lowercase.
const CHALLENGE_MARKERS: [&str; 5] = [
    "cf-browser-verification",
    "cf-chl-",
    "challenge-platform",
    "just a moment...",
    "attention required!",
];

/// HTTP fetcher shared by listing and detail requests.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Build a fetcher with browser-like headers from the fetch config.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch one page, retrying transient failures.
    ///
    /// Retries cover connect/timeout errors, 5xx, 429, and challenge
    /// responses (some interstitials clear on a second request); a
    /// definitive 4xx returns immediately.
    pub async fn fetch(&self, url: &str) -> Result<RawDocument> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(doc) => return Ok(doc),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    log::debug!(
                        "Retry {}/{} for {} after {}",
                        attempt,
                        self.config.max_retries,
                        url,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<RawDocument> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        if Self::looks_like_challenge(&body) {
            return Err(AppError::Challenge { url: final_url });
        }
        if !status.is_success() {
            return Err(AppError::Status {
                url: final_url,
                status: status.as_u16(),
            });
        }

        Ok(RawDocument {
            url: final_url,
            body,
        })
    }

    /// Whether a response body is a bot-challenge interstitial.
    fn looks_like_challenge(body: &str) -> bool {
        // Challenge pages are small; cap the scan to keep large listing
        // bodies cheap.
        let haystack: String = body.chars().take(4096).collect::<String>().to_lowercase();
        CHALLENGE_MARKERS.iter().any(|m| haystack.contains(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_markers() {
        let challenge = r#"<html><head><title>Just a moment...</title></head>
            <body><div id="cf-browser-verification"></div></body></html>"#;
        assert!(Fetcher::looks_like_challenge(challenge));

        let listing = "<html><body><div class=\"content-list-item\">Seminar</div></body></html>";
        assert!(!Fetcher::looks_like_challenge(listing));
    }

    #[test]
    fn test_build_with_defaults() {
        assert!(Fetcher::new(&FetchConfig::default()).is_ok());
    }
}
