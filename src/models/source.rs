//! Source definitions: one entry per department site.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::text::slugify;

/// One department/site to harvest. Supplied by configuration, never
/// mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name (e.g. "History")
    pub name: String,

    /// Site root (e.g. "https://history.example.edu")
    pub base_url: String,

    /// Events listing page URL
    pub listing_url: String,

    /// Meta category tag (e.g. "arts_humanities")
    pub category: String,

    /// Event type used when no keyword matches; falls back to "Event"
    #[serde(default)]
    pub default_event_type: Option<String>,

    /// Selector overrides; defaults cover the common Drupal layout
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl SourceConfig {
    /// Filesystem-safe identifier derived from the display name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// CSS selectors used to locate containers and fields.
///
/// Each field has a default matching the Drupal events layout shared by
/// most department sites; individual sources override only what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Structural container selectors, tried in order (strategy 1)
    #[serde(default = "defaults::containers")]
    pub containers: Vec<String>,

    /// Class-name keywords for the generic fallback (strategy 2)
    #[serde(default = "defaults::class_keywords")]
    pub class_keywords: Vec<String>,

    /// Title element inside a container
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Date/time field wrapper inside a container
    #[serde(default = "defaults::date")]
    pub date: String,

    /// Full-date span inside the date wrapper
    #[serde(default = "defaults::date_day")]
    pub date_day: String,

    /// Time span(s) inside the date wrapper
    #[serde(default = "defaults::date_time")]
    pub date_time: String,

    /// Location element
    #[serde(default = "defaults::location")]
    pub location: String,

    /// Listing summary/teaser element
    #[serde(default = "defaults::summary")]
    pub summary: String,

    /// Audience element
    #[serde(default = "defaults::audience")]
    pub audience: String,

    /// Series/category element
    #[serde(default = "defaults::series")]
    pub series: String,

    /// Attribute carrying the event link
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Detail page: long description
    #[serde(default = "defaults::detail_description")]
    pub detail_description: String,

    /// Detail page: speaker links
    #[serde(default = "defaults::detail_speaker")]
    pub detail_speaker: String,

    /// Detail page: speaker affiliation
    #[serde(default = "defaults::detail_affiliation")]
    pub detail_affiliation: String,

    /// Detail page: topic tags
    #[serde(default = "defaults::detail_topics")]
    pub detail_topics: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            containers: defaults::containers(),
            class_keywords: defaults::class_keywords(),
            title: defaults::title(),
            date: defaults::date(),
            date_day: defaults::date_day(),
            date_time: defaults::date_time(),
            location: defaults::location(),
            summary: defaults::summary(),
            audience: defaults::audience(),
            series: defaults::series(),
            link_attr: defaults::link_attr(),
            detail_description: defaults::detail_description(),
            detail_speaker: defaults::detail_speaker(),
            detail_affiliation: defaults::detail_affiliation(),
            detail_topics: defaults::detail_topics(),
        }
    }
}

/// The configured source list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sources {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl Sources {
    /// Load the source list from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate the source list for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(AppError::validation("Source with empty name"));
            }
            for (field, value) in [
                ("base_url", &source.base_url),
                ("listing_url", &source.listing_url),
            ] {
                if !value.starts_with("http") {
                    return Err(AppError::validation(format!(
                        "Source '{}': {} must be an absolute http(s) URL",
                        source.name, field
                    )));
                }
            }
            if source.category.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Source '{}': category is empty",
                    source.name
                )));
            }
        }
        Ok(())
    }
}

mod defaults {
    // Container selectors seen across department Drupal themes, most
    // specific first.
    pub fn containers() -> Vec<String> {
        [
            "div.content-list-item",
            "div.event-item",
            "article.event",
            "div.views-row",
            "li.event",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn class_keywords() -> Vec<String> {
        ["event", "seminar", "item", "card"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn title() -> String {
        "span.field--name-title a, h2 a, h3 a".into()
    }
    pub fn date() -> String {
        "div.field--name-field-ps-events-date".into()
    }
    pub fn date_day() -> String {
        "span.day".into()
    }
    pub fn date_time() -> String {
        "span.time".into()
    }
    pub fn location() -> String {
        "div.field--name-field-ps-events-location-name .field__item".into()
    }
    pub fn summary() -> String {
        "div.field--name-field-ps-summary".into()
    }
    pub fn audience() -> String {
        "div.field--name-field-ps-events-audience".into()
    }
    pub fn series() -> String {
        "div.field--name-field-ps-events-category .field__item".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn detail_description() -> String {
        "div.field--name-body, div.field--name-field-ps-events-description".into()
    }
    pub fn detail_speaker() -> String {
        "div.field--name-field-ps-events-speaker a".into()
    }
    pub fn detail_affiliation() -> String {
        "div.field--name-field-ps-events-speaker-affiliation".into()
    }
    pub fn detail_topics() -> String {
        "div.field--name-field-ps-events-topics .field__item".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source() -> SourceConfig {
        SourceConfig {
            name: "East Asian Studies".to_string(),
            base_url: "https://eas.example.edu".to_string(),
            listing_url: "https://eas.example.edu/events".to_string(),
            category: "area_studies".to_string(),
            default_event_type: None,
            selectors: SelectorConfig::default(),
        }
    }

    #[test]
    fn test_slug() {
        assert_eq!(sample_source().slug(), "east_asian_studies");
    }

    #[test]
    fn validate_accepts_sample() {
        let sources = Sources {
            sources: vec![sample_source()],
        };
        assert!(sources.validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_listing_url() {
        let mut source = sample_source();
        source.listing_url = "/events".to_string();
        let sources = Sources {
            sources: vec![source],
        };
        assert!(sources.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_list() {
        assert!(Sources::default().validate().is_err());
    }

    #[test]
    fn toml_roundtrip_with_overrides() {
        let toml_src = r#"
            [[sources]]
            name = "History"
            base_url = "https://history.example.edu"
            listing_url = "https://history.example.edu/events"
            category = "arts_humanities"
            default_event_type = "Lecture"

            [sources.selectors]
            containers = ["div.hist-event"]
        "#;
        let sources: Sources = toml::from_str(toml_src).unwrap();
        assert_eq!(sources.sources.len(), 1);
        let s = &sources.sources[0];
        assert_eq!(s.selectors.containers, vec!["div.hist-event"]);
        // Unspecified fields keep the Drupal defaults
        assert_eq!(s.selectors.date_day, "span.day");
    }
}
