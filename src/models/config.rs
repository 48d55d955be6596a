//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and paging behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Field normalization settings
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Shared keyword tables (event types, tag vocabularies)
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.max_pages == 0 {
            return Err(AppError::validation("fetch.max_pages must be > 0"));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(AppError::validation("fetch.max_concurrent must be > 0"));
        }
        if self.normalize.min_title_len == 0 {
            return Err(AppError::validation("normalize.min_title_len must be > 0"));
        }
        if self.keywords.event_types.is_empty() {
            return Err(AppError::validation("No event type keywords defined"));
        }
        Ok(())
    }
}

/// HTTP client and paging behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between successive page/detail requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Retry attempts for transient fetch failures
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Fixed delay between retries in milliseconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,

    /// Hard cap on listing pages walked per source
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Maximum sources scraped concurrently
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Overall deadline per source in seconds
    #[serde(default = "defaults::source_deadline")]
    pub source_deadline_secs: u64,

    /// Whether to fetch individual event pages for extra fields
    #[serde(default = "defaults::fetch_details")]
    pub fetch_details: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_retries: defaults::max_retries(),
            retry_delay_ms: defaults::retry_delay(),
            max_pages: defaults::max_pages(),
            max_concurrent: defaults::max_concurrent(),
            source_deadline_secs: defaults::source_deadline(),
            fetch_details: defaults::fetch_details(),
        }
    }
}

/// Field normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Minimum accepted title length; shorter candidates are boilerplate
    #[serde(default = "defaults::min_title_len")]
    pub min_title_len: usize,

    /// Sentinel used when no location can be resolved
    #[serde(default = "defaults::default_location")]
    pub default_location: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_title_len: defaults::min_title_len(),
            default_location: defaults::default_location(),
        }
    }
}

/// Keyword tables shared by every source.
///
/// Kept as configuration data rather than per-source literals so the
/// classification behavior is centrally testable and overridable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Ordered event-type keyword table; first match wins
    #[serde(default = "defaults::event_types")]
    pub event_types: Vec<EventTypeKeyword>,

    /// Tag vocabularies keyed by source category
    #[serde(default = "defaults::category_tags")]
    pub category_tags: Vec<CategoryTagSet>,

    /// Tags applicable to any source
    #[serde(default = "defaults::common_tags")]
    pub common_tags: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            event_types: defaults::event_types(),
            category_tags: defaults::category_tags(),
            common_tags: defaults::common_tags(),
        }
    }
}

/// Mapping from a lowercase keyword to a display event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTypeKeyword {
    /// Keyword searched in title + series text
    pub keyword: String,

    /// Canonical event type label
    pub label: String,
}

/// Tag vocabulary for one source category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTagSet {
    /// Category id as used in source configs (e.g. "arts_humanities")
    pub category: String,

    /// Candidate tags for events in this category
    pub tags: Vec<String>,
}

mod defaults {
    use super::{CategoryTagSet, EventTypeKeyword};

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        2000
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_delay() -> u64 {
        1500
    }
    pub fn max_pages() -> u32 {
        10
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn source_deadline() -> u64 {
        300
    }
    pub fn fetch_details() -> bool {
        true
    }

    // Normalize defaults
    pub fn min_title_len() -> usize {
        6
    }
    pub fn default_location() -> String {
        "Location TBD".into()
    }

    // Keyword defaults. Order matters: the first keyword found in the
    // title/series text decides the event type.
    pub fn event_types() -> Vec<EventTypeKeyword> {
        [
            ("colloquium", "Colloquium"),
            ("seminar", "Seminar"),
            ("workshop", "Workshop"),
            ("lecture", "Lecture"),
            ("conference", "Conference"),
            ("panel", "Panel"),
            ("discussion", "Discussion"),
            ("symposium", "Symposium"),
            ("talk", "Talk"),
        ]
        .into_iter()
        .map(|(keyword, label)| EventTypeKeyword {
            keyword: keyword.into(),
            label: label.into(),
        })
        .collect()
    }

    pub fn category_tags() -> Vec<CategoryTagSet> {
        let sets: [(&str, &[&str]); 5] = [
            (
                "arts_humanities",
                &["humanities", "arts", "literature", "history", "philosophy", "culture"],
            ),
            (
                "social_sciences",
                &["social sciences", "sociology", "politics", "economics", "anthropology"],
            ),
            (
                "sciences_engineering",
                &["science", "engineering", "technology", "research", "innovation"],
            ),
            (
                "area_studies",
                &["area studies", "international", "global", "cultural studies"],
            ),
            (
                "interdisciplinary",
                &["interdisciplinary", "cross-disciplinary", "multidisciplinary"],
            ),
        ];
        sets.into_iter()
            .map(|(category, tags)| CategoryTagSet {
                category: category.into(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })
            .collect()
    }

    pub fn common_tags() -> Vec<String> {
        [
            "university", "academic", "education", "seminar", "colloquium", "lecture",
            "talk", "workshop", "conference", "presentation", "discussion", "symposium",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
