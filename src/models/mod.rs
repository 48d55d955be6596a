// src/models/mod.rs

//! Domain models for the event harvester.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

mod config;
mod dataset;
mod event;
mod report;
mod source;

// Re-export all public types
pub use config::{CategoryTagSet, Config, EventTypeKeyword, FetchConfig, KeywordConfig, NormalizeConfig};
pub use dataset::{CombinedDataset, CorpusMeta, DepartmentStat, SourceDataset, SourceMeta};
pub use event::{DetailFields, EventRecord};
pub use report::{RunReport, SourceReport};
pub use source::{SelectorConfig, SourceConfig, Sources};

/// Raw bytes/text of one fetched page plus its originating URL.
///
/// Owned by the fetcher until handed to extraction; not retained after.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub body: String,
}
