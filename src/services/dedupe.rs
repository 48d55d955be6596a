//! Record deduplication within one run and across the corpus.
//!
//! Identity is the exact (normalized title, date, time) key. Within a
//! single source run the first occurrence wins; when merging many runs
//! into the corpus, a later batch's record replaces an earlier one with
//! the same key.

use std::collections::{HashMap, HashSet};

use crate::models::EventRecord;

/// Drop duplicates within one run, keeping the first occurrence.
pub fn dedupe_first_wins(records: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.dedup_key()) {
            unique.push(record);
        }
    }
    unique
}

/// Merge batches corpus-wide with last-write-wins semantics.
///
/// Batches arrive in run order; a later record with an already-seen key
/// replaces the earlier one in place. Returns the merged records and the
/// number of replacements plus intra-batch drops.
pub fn merge_last_wins(batches: Vec<Vec<EventRecord>>) -> (Vec<EventRecord>, usize) {
    let mut merged: Vec<EventRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut removed = 0;

    for batch in batches {
        for record in batch {
            let key = record.dedup_key();
            match index.get(&key) {
                Some(&pos) => {
                    merged[pos] = record;
                    removed += 1;
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(record);
                }
            }
        }
    }

    (merged, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(title: &str, date: &str, time: &str, department: &str) -> EventRecord {
        let now = Utc::now();
        EventRecord {
            id: EventRecord::derive_id(department, date, title),
            title: title.to_string(),
            description: String::new(),
            start_date: date.to_string(),
            end_date: None,
            time: time.to_string(),
            location: "Location TBD".to_string(),
            event_type: "Event".to_string(),
            department: department.to_string(),
            meta_category: "arts_humanities".to_string(),
            source_url: String::new(),
            source_name: format!("{department} Events"),
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
    fn test_identical_records_collapse() {
        let records = vec![
            event("Colloquium: X", "2025-09-24", "3:00 pm", "History"),
            event("Colloquium: X", "2025-09-24", "3:00 pm", "History"),
        ];
        assert_eq!(dedupe_first_wins(records).len(), 1);
    }

    #[test]
    fn test_different_time_stays_distinct() {
        let records = vec![
            event("Colloquium: X", "2025-09-24", "3:00 pm", "History"),
            event("Colloquium: X", "2025-09-24", "5:00 pm", "History"),
        ];
        assert_eq!(dedupe_first_wins(records).len(), 2);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let records = vec![
            event("A talk", "2025-09-24", "", "History"),
            event("A talk", "2025-09-24", "", "History"),
            event("Another talk", "2025-09-25", "", "History"),
        ];
        let once = dedupe_first_wins(records);
        let twice = dedupe_first_wins(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_corpus_merge_last_wins() {
        let earlier = event("Colloquium: X", "2025-09-24", "3:00 pm", "History");
        let mut later = event("Colloquium: X", "2025-09-24", "3:00 pm", "History");
        later.description = "refreshed".to_string();

        let (merged, removed) = merge_last_wins(vec![vec![earlier], vec![later]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(removed, 1);
        assert_eq!(merged[0].description, "refreshed");
    }

    #[test]
    fn test_corpus_merge_preserves_distinct_records() {
        let a = event("Talk A", "2025-09-24", "", "History");
        let b = event("Talk B", "2025-09-24", "", "Physics");
        let (merged, removed) = merge_last_wins(vec![vec![a], vec![b]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(removed, 0);
    }
}
