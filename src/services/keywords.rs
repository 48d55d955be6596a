//! Shared keyword lookup tables.
//!
//! One compiled table serves every source, so event-type precedence and
//! tag vocabularies are defined (and tested) in exactly one place instead
//! of being copied into each source handler.

use std::collections::HashMap;

use crate::models::KeywordConfig;

/// Compiled keyword lookups built from [`KeywordConfig`].
pub struct KeywordTable {
    event_types: Vec<(String, String)>,
    category_tags: HashMap<String, Vec<String>>,
    common_tags: Vec<String>,
}

impl KeywordTable {
    /// Build the table from configuration data.
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            event_types: config
                .event_types
                .iter()
                .map(|e| (e.keyword.to_lowercase(), e.label.clone()))
                .collect(),
            category_tags: config
                .category_tags
                .iter()
                .map(|set| {
                    (
                        set.category.clone(),
                        set.tags.iter().map(|t| t.to_lowercase()).collect(),
                    )
                })
                .collect(),
            common_tags: config.common_tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Resolve an event type from title + series text.
    ///
    /// Keywords are tested in table order; the first one contained in the
    /// text wins.
    pub fn classify_event_type(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.event_types
            .iter()
            .find(|(keyword, _)| haystack.contains(keyword))
            .map(|(_, label)| label.as_str())
    }

    /// Whether the text mentions any event-type keyword at all.
    ///
    /// Used by the free-text extraction strategy to decide if a text
    /// block looks event-like.
    pub fn mentions_event_keyword(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.event_types
            .iter()
            .any(|(keyword, _)| haystack.contains(keyword))
    }

    /// Tags from the category vocabulary plus the common set that
    /// actually occur in the given text, lowercased and deduplicated.
    pub fn tags_for(&self, category: &str, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();
        let mut tags = Vec::new();
        let candidates = self
            .category_tags
            .get(category)
            .into_iter()
            .flatten()
            .chain(self.common_tags.iter());
        for tag in candidates {
            if haystack.contains(tag.as_str()) && !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }
}
