//! Detail-page enrichment.
//!
//! Listing cards carry a teaser at best; the event's own page has the
//! long description, speakers, and topics. Enrichment is strictly
//! best-effort: any fetch or parse failure here degrades to "no extra
//! fields" and must never take the source down with it.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{DetailFields, EventRecord, SourceConfig};
use crate::services::dates::DateResolver;
use crate::services::fetcher::Fetcher;
use crate::services::normalize::parse_selector;
use crate::utils::text::normalize_whitespace;
use crate::utils::url::same_host_family;

/// Maximum speaker names joined into the speaker field.
const MAX_SPEAKERS: usize = 3;

/// Fetches and parses individual event pages for one source.
pub struct DetailFetcher<'a> {
    fetcher: &'a Fetcher,
    resolver: &'a DateResolver,
    base_url: &'a str,
    description: Selector,
    speaker: Selector,
    affiliation: Selector,
    topics: Selector,
    date: Selector,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(
        source: &'a SourceConfig,
        fetcher: &'a Fetcher,
        resolver: &'a DateResolver,
    ) -> Result<Self> {
        let s = &source.selectors;
        Ok(Self {
            fetcher,
            resolver,
            base_url: &source.base_url,
            description: parse_selector(&s.detail_description)?,
            speaker: parse_selector(&s.detail_speaker)?,
            affiliation: parse_selector(&s.detail_affiliation)?,
            topics: parse_selector(&s.detail_topics)?,
            date: parse_selector(&s.date)?,
        })
    }

    /// Whether this record's URL qualifies for a detail fetch.
    pub fn applies_to(&self, record: &EventRecord) -> bool {
        !record.source_url.is_empty() && same_host_family(&record.source_url, self.base_url)
    }

    /// Fetch the record's page and return whatever fields resolved.
    ///
    /// The caller merges with fill-if-empty semantics; an `Err` counts as
    /// a failed (but non-fatal) enrichment.
    pub async fn enrich(&self, record: &EventRecord) -> Result<DetailFields> {
        let doc = self.fetcher.fetch(&record.source_url).await?;
        Ok(self.extract(&Html::parse_document(&doc.body), record))
    }

    fn extract(&self, doc: &Html, record: &EventRecord) -> DetailFields {
        let mut details = DetailFields::default();

        if let Some(el) = doc.select(&self.description).next() {
            details.description = normalize_whitespace(&el.text().collect::<String>());
        }

        let speakers: Vec<String> = doc
            .select(&self.speaker)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|name| name.chars().count() > 2)
            .take(MAX_SPEAKERS)
            .collect();
        if !speakers.is_empty() {
            details.speaker = speakers.join("; ");
        }

        if let Some(el) = doc.select(&self.affiliation).next() {
            details.speaker_affiliation = normalize_whitespace(&el.text().collect::<String>());
        }

        details.topics = doc
            .select(&self.topics)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .collect();

        // Time fallback for listings that only carried a date badge.
        if record.time.is_empty() {
            if let Some(el) = doc.select(&self.date).next() {
                let text = normalize_whitespace(&el.text().collect::<String>());
                details.time = self.resolver.resolve_time(&text);
            }
        }

        details
    }
}
