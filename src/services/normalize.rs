//! Field normalization: candidate container to canonical record.
//!
//! Every field goes through its own cascade: a structurally tagged
//! sub-element first, then a pattern search over the container's visible
//! text, then a constant default. A candidate with no usable title is
//! discarded here and nowhere else.

use chrono::Utc;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};
use crate::models::{EventRecord, NormalizeConfig, SourceConfig};
use crate::services::dates::DateResolver;
use crate::services::extract::Candidate;
use crate::services::keywords::KeywordTable;
use crate::utils::text::normalize_whitespace;
use crate::utils::url::resolve;

/// Per-source normalizer with its selectors compiled once.
pub struct FieldNormalizer<'a> {
    source: &'a SourceConfig,
    keywords: &'a KeywordTable,
    resolver: &'a DateResolver,
    rules: &'a NormalizeConfig,
    sel: CompiledSelectors,
    speaker_paren: Regex,
    name_like: Regex,
}

struct CompiledSelectors {
    title: Selector,
    title_fallback: Selector,
    date: Selector,
    date_day: Selector,
    date_time: Selector,
    location: Selector,
    summary: Selector,
    audience: Selector,
    series: Selector,
    link: Selector,
}

impl<'a> FieldNormalizer<'a> {
    pub fn new(
        source: &'a SourceConfig,
        keywords: &'a KeywordTable,
        resolver: &'a DateResolver,
        rules: &'a NormalizeConfig,
    ) -> Result<Self> {
        let s = &source.selectors;
        Ok(Self {
            source,
            keywords,
            resolver,
            rules,
            sel: CompiledSelectors {
                title: parse_selector(&s.title)?,
                title_fallback: parse_selector("h1, h2, h3, h4, h5, h6, a[href]")?,
                date: parse_selector(&s.date)?,
                date_day: parse_selector(&s.date_day)?,
                date_time: parse_selector(&s.date_time)?,
                location: parse_selector(&s.location)?,
                summary: parse_selector(&s.summary)?,
                audience: parse_selector(&s.audience)?,
                series: parse_selector(&s.series)?,
                link: parse_selector("a[href]")?,
            },
            speaker_paren: Regex::new(
                r"([A-Z][a-z]+ [A-Z][a-z-]+(?: [A-Z][a-z-]+)?)\s*\(([^)]+)\)",
            )
            .expect("static regex"),
            name_like: Regex::new(r"^[A-Z][a-z]+ [A-Z][a-z-]+(?: [A-Z][a-z-]+)?$")
                .expect("static regex"),
        })
    }

    /// Normalize one candidate into a record, or None when no usable
    /// title can be resolved.
    pub fn normalize(&self, candidate: &Candidate<'_>) -> Option<EventRecord> {
        match candidate {
            Candidate::Element(el) => self.normalize_element(*el),
            Candidate::Text(block) => self.normalize_text(block),
        }
    }

    fn normalize_element(&self, el: ElementRef<'_>) -> Option<EventRecord> {
        let title = self.resolve_title(el)?;
        let source_url = self.resolve_link(el).unwrap_or_default();
        let (start_date, time) = self.resolve_date_time(el);

        let location = self
            .select_text(el, &self.sel.location)
            .unwrap_or_else(|| self.rules.default_location.clone());
        let description = self.select_text(el, &self.sel.summary).unwrap_or_default();
        let audience = self.select_text(el, &self.sel.audience).unwrap_or_default();
        let series = self.select_text(el, &self.sel.series).unwrap_or_default();

        let event_type = self.resolve_event_type(&format!("{title} {series}"));
        let (speaker, speaker_affiliation) = self.speaker_from_title(&title);
        let tags = self
            .keywords
            .tags_for(&self.source.category, &format!("{title} {description}"));

        Some(self.build_record(
            title,
            description,
            start_date,
            time,
            location,
            event_type,
            source_url,
            speaker,
            speaker_affiliation,
            audience,
            tags,
        ))
    }

    fn normalize_text(&self, block: &str) -> Option<EventRecord> {
        let title = block
            .lines()
            .map(normalize_whitespace)
            .find(|line| !self.is_boilerplate(line))?;
        let (start_date, time) = self.resolver.resolve(block);

        let event_type = self.resolve_event_type(&format!("{title} {block}"));
        let (speaker, speaker_affiliation) = self.speaker_from_title(&title);
        let tags = self.keywords.tags_for(&self.source.category, block);

        Some(self.build_record(
            title,
            String::new(),
            start_date,
            time,
            self.rules.default_location.clone(),
            event_type,
            String::new(),
            speaker,
            speaker_affiliation,
            String::new(),
            tags,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_record(
        &self,
        title: String,
        description: String,
        start_date: String,
        time: String,
        location: String,
        event_type: String,
        source_url: String,
        speaker: String,
        speaker_affiliation: String,
        audience: String,
        tags: Vec<String>,
    ) -> EventRecord {
        let now = Utc::now();
        EventRecord {
            id: EventRecord::derive_id(&self.source.name, &start_date, &title),
            title,
            description,
            start_date,
            end_date: None,
            time,
            location,
            event_type,
            department: self.source.name.clone(),
            meta_category: self.source.category.clone(),
            source_url,
            source_name: format!("{} Events", self.source.name),
            speaker,
            speaker_affiliation,
            audience,
            topics: Vec::new(),
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Title cascade: configured selector, then generic headings/links,
    /// then the first acceptable line of visible text.
    fn resolve_title(&self, el: ElementRef<'_>) -> Option<String> {
        for selector in [&self.sel.title, &self.sel.title_fallback] {
            for candidate in el.select(selector) {
                let text = normalize_whitespace(&candidate.text().collect::<String>());
                if !self.is_boilerplate(&text) {
                    return Some(text);
                }
            }
        }
        el.text()
            .map(normalize_whitespace)
            .find(|line| !self.is_boilerplate(line))
    }

    /// Event link: the title element's own href, else the first link in
    /// the container, resolved against the source base URL.
    fn resolve_link(&self, el: ElementRef<'_>) -> Option<String> {
        let attr = self.source.selectors.link_attr.as_str();
        let href = el
            .select(&self.sel.title)
            .find_map(|t| t.value().attr(attr))
            .or_else(|| el.select(&self.sel.link).find_map(|a| a.value().attr(attr)))?;
        resolve(&self.source.base_url, href)
    }

    /// Date/time cascade: dedicated date wrapper (day span + time spans),
    /// else pattern search over the whole container text.
    fn resolve_date_time(&self, el: ElementRef<'_>) -> (String, String) {
        let Some(wrapper) = el.select(&self.sel.date).next() else {
            let text = Candidate::Element(el).text();
            return self.resolver.resolve(&text);
        };

        let wrapper_text = normalize_whitespace(&wrapper.text().collect::<String>());
        let date = match wrapper.select(&self.sel.date_day).next() {
            Some(day) => {
                let day_text = normalize_whitespace(&day.text().collect::<String>());
                self.resolver.resolve_date(&day_text)
            }
            None => self.resolver.resolve_date(&wrapper_text),
        };

        let times: Vec<String> = wrapper
            .select(&self.sel.date_time)
            .map(|t| {
                let token = normalize_whitespace(&t.text().collect::<String>());
                self.resolver.resolve_time(&token)
            })
            .filter(|t| !t.is_empty())
            .collect();
        let time = match times.len() {
            0 => self.resolver.resolve_time(&wrapper_text),
            1 => times[0].clone(),
            _ => format!("{} - {}", times[0], times[1]),
        };

        (date, time)
    }

    fn resolve_event_type(&self, text: &str) -> String {
        self.keywords
            .classify_event_type(text)
            .map(str::to_string)
            .or_else(|| self.source.default_event_type.clone())
            .unwrap_or_else(|| "Event".to_string())
    }

    /// Speaker heuristics over the title: "Name (Affiliation)" first,
    /// then the "Some Title: Speaker Name" shape.
    fn speaker_from_title(&self, title: &str) -> (String, String) {
        if let Some(caps) = self.speaker_paren.captures(title) {
            return (caps[1].to_string(), caps[2].trim().to_string());
        }
        if let Some((_, tail)) = title.rsplit_once(':') {
            let tail = tail.trim();
            if self.name_like.is_match(tail) {
                return (tail.to_string(), String::new());
            }
        }
        (String::new(), String::new())
    }

    fn select_text(&self, el: ElementRef<'_>, selector: &Selector) -> Option<String> {
        el.select(selector)
            .next()
            .map(|e| normalize_whitespace(&e.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }

    /// Reject navigation labels and other non-titles: too short, purely
    /// numeric, or shouty all-uppercase text.
    fn is_boilerplate(&self, text: &str) -> bool {
        if text.chars().count() < self.rules.min_title_len {
            return true;
        }
        if text
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c.is_ascii_punctuation())
        {
            return true;
        }
        let mut has_alpha = false;
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            has_alpha = true;
            if c.is_lowercase() {
                return false;
            }
        }
        has_alpha
    }
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
