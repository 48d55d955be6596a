//! Canonical event record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::utils::text::{slugify, truncate_graphemes};

/// A normalized event harvested from one source.
///
/// `title` is the only mandatory field: a record without a resolvable
/// title never gets constructed. `start_date` is either empty or a valid
/// `YYYY-MM-DD` string; a malformed source date is represented as empty,
/// never as a wrong date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    /// Derived identifier; unique within a source run, not across sources
    pub id: String,

    /// Event title
    pub title: String,

    /// Short or long description
    #[serde(default)]
    pub description: String,

    /// ISO calendar date, or empty when unresolvable
    #[serde(default)]
    pub start_date: String,

    /// Optional end date for multi-day events
    #[serde(default)]
    pub end_date: Option<String>,

    /// Normalized time or time range ("3:00 pm - 4:20 pm"), or empty
    #[serde(default)]
    pub time: String,

    /// Venue text; a sentinel rather than empty when unknown
    #[serde(default)]
    pub location: String,

    /// Resolved event type ("Seminar", "Colloquium", ...)
    #[serde(default)]
    pub event_type: String,

    /// Department display name (from the source config)
    pub department: String,

    /// Meta category (from the source config)
    pub meta_category: String,

    /// Canonical absolute URL of the event page
    #[serde(default)]
    pub source_url: String,

    /// Human-readable source label
    #[serde(default)]
    pub source_name: String,

    /// Speaker name(s)
    #[serde(default)]
    pub speaker: String,

    /// Speaker affiliation
    #[serde(default)]
    pub speaker_affiliation: String,

    /// Intended audience
    #[serde(default)]
    pub audience: String,

    /// Topic strings from the detail page
    #[serde(default)]
    pub topics: Vec<String>,

    /// Lowercase keyword tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Provenance timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRecord {
    /// Derive the record id from department, event date, and title.
    ///
    /// Shape: `{dept_slug}_{yyyymmdd|undated}_{title_slug}_{hash8}`. The
    /// hash suffix keeps ids distinct for same-day events whose titles
    /// share a 20-grapheme prefix.
    pub fn derive_id(department: &str, start_date: &str, title: &str) -> String {
        let date_part = if start_date.is_empty() {
            "undated".to_string()
        } else {
            start_date.replace('-', "")
        };
        let title_slug = slugify(&truncate_graphemes(title, 20));
        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update(b"|");
        hasher.update(start_date.as_bytes());
        let digest = hasher.finalize();
        let hash8 = hex::encode(&digest[..4]);
        format!("{}_{}_{}_{}", slugify(department), date_part, title_slug, hash8)
    }

    /// Key identifying the same real-world event across records.
    ///
    /// Exact string match on normalized title + date + time; punctuation
    /// variants intentionally stay distinct.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.title.trim().to_lowercase(),
            self.start_date,
            self.time
        )
    }

    /// Merge detail-page fields into this record.
    ///
    /// Scalars only fill empty fields; topics append and deduplicate.
    pub fn merge_details(&mut self, details: DetailFields) {
        let mut changed = false;

        let scalar_merges = [
            (&mut self.description, details.description),
            (&mut self.speaker, details.speaker),
            (&mut self.speaker_affiliation, details.speaker_affiliation),
            (&mut self.audience, details.audience),
            (&mut self.time, details.time),
        ];
        for (field, incoming) in scalar_merges {
            if field.is_empty() && !incoming.is_empty() {
                *field = incoming;
                changed = true;
            }
        }

        for topic in details.topics {
            if !topic.is_empty() && !self.topics.contains(&topic) {
                self.topics.push(topic);
                changed = true;
            }
        }

        if changed {
            self.updated_at = Utc::now();
        }
    }
}

/// Fields recovered from an event's own detail page.
///
/// Only the fields the detail parser could resolve are non-empty; callers
/// merge, never overwrite existing listing data with blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub description: String,
    pub speaker: String,
    pub speaker_affiliation: String,
    pub audience: String,
    pub time: String,
    pub topics: Vec<String>,
}

impl DetailFields {
    /// True when no field was resolved at all.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.speaker.is_empty()
            && self.speaker_affiliation.is_empty()
            && self.audience.is_empty()
            && self.time.is_empty()
            && self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(title: &str, date: &str, time: &str) -> EventRecord {
        let now = Utc::now();
        EventRecord {
            id: EventRecord::derive_id("History", date, title),
            title: title.to_string(),
            description: String::new(),
            start_date: date.to_string(),
            end_date: None,
            time: time.to_string(),
            location: "Location TBD".to_string(),
            event_type: "Event".to_string(),
            department: "History".to_string(),
            meta_category: "arts_humanities".to_string(),
            source_url: "https://history.example.edu/events/1".to_string(),
            source_name: "History Events".to_string(),
            speaker: String::new(),
            speaker_affiliation: String::new(),
            audience: String::new(),
            topics: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_derive_id_shape() {
        let id = EventRecord::derive_id("East Asian Studies", "2025-09-24", "Empire and Memory");
        assert!(id.starts_with("east_asian_studies_20250924_empire_and_memory_"));
        // 8 hex chars appended
        let suffix = id.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_id_undated() {
        let id = EventRecord::derive_id("History", "", "Untimed Talk");
        assert!(id.contains("_undated_"));
    }

    #[test]
    fn test_dedup_key_case_insensitive_title() {
        let a = sample_event("Colloquium: X", "2025-09-24", "3:00 pm");
        let b = sample_event("colloquium: x", "2025-09-24", "3:00 pm");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_merge_details_fills_only_empty() {
        let mut event = sample_event("Talk", "2025-09-24", "3:00 pm");
        event.description = "from listing".to_string();

        event.merge_details(DetailFields {
            description: "from detail".to_string(),
            speaker: "Ada Lovelace".to_string(),
            topics: vec!["computing".to_string()],
            ..DetailFields::default()
        });

        assert_eq!(event.description, "from listing");
        assert_eq!(event.speaker, "Ada Lovelace");
        assert_eq!(event.topics, vec!["computing"]);
    }

    #[test]
    fn test_merge_details_dedupes_topics() {
        let mut event = sample_event("Talk", "2025-09-24", "");
        event.topics = vec!["history".to_string()];
        event.merge_details(DetailFields {
            topics: vec!["history".to_string(), "empire".to_string()],
            ..DetailFields::default()
        });
        assert_eq!(event.topics, vec!["history", "empire"]);
    }

    #[test]
    fn test_empty_details_do_not_touch_record() {
        let mut event = sample_event("Talk", "2025-09-24", "3:00 pm");
        let before = event.clone();
        event.merge_details(DetailFields::default());
        assert_eq!(event, before);
    }
}
