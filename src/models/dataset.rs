//! Output dataset envelopes.
//!
//! Per-source files and the combined corpus share the same shape the
//! downstream site consumes: a `metadata` object plus an `events` array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EventRecord, SourceConfig};

/// Metadata block of one source's output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMeta {
    pub department: String,
    pub total_events: usize,
    pub scraped_at: DateTime<Utc>,
    pub source_url: String,
    pub source: String,
}

/// One source's scraped output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDataset {
    pub metadata: SourceMeta,
    pub events: Vec<EventRecord>,
}

impl SourceDataset {
    /// Wrap a finished source run into its output envelope.
    pub fn new(source: &SourceConfig, events: Vec<EventRecord>) -> Self {
        Self {
            metadata: SourceMeta {
                department: source.name.clone(),
                total_events: events.len(),
                scraped_at: Utc::now(),
                source_url: source.listing_url.clone(),
                source: format!("{} Events", source.name),
            },
            events,
        }
    }
}

/// Per-department statistics in the combined corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentStat {
    pub name: String,
    pub meta_category: String,
    pub event_count: usize,
}

/// Metadata block of the combined corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusMeta {
    pub total_events: usize,
    pub total_departments: usize,
    pub files_processed: usize,
    pub successful_files: usize,
    pub deduplication_removed: usize,
    pub aggregated_at: DateTime<Utc>,
}

/// The consolidated cross-source dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedDataset {
    pub metadata: CorpusMeta,
    pub departments: Vec<DepartmentStat>,
    pub events: Vec<EventRecord>,
}
