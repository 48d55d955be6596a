//! Storage abstractions for harvested event data.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Run configuration
//! ├── sources.toml          # Source list
//! ├── sources/              # One dataset per scraped source
//! │   ├── history.json
//! │   └── physics.json
//! ├── events.json           # Combined corpus (aggregate output)
//! └── report.json           # Last run summary
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CombinedDataset, RunReport, SourceDataset};

// Re-export for convenience
pub use local::LocalStorage;

/// One per-source dataset file read back from storage.
#[derive(Debug, Clone)]
pub struct StoredDataset {
    /// Source slug derived from the file name
    pub slug: String,
    /// The parsed dataset
    pub dataset: SourceDataset,
}

/// Result of scanning the per-source dataset directory.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Datasets that parsed, in sorted file order
    pub datasets: Vec<StoredDataset>,
    /// Files considered
    pub files_processed: usize,
    /// Files that parsed successfully
    pub successful_files: usize,
}

/// Trait for event storage backends.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Write one source's dataset under `sources/{slug}.json`.
    async fn write_source(&self, slug: &str, dataset: &SourceDataset) -> Result<()>;

    /// Read every per-source dataset, skipping unreadable files.
    async fn scan_sources(&self) -> Result<ScanOutcome>;

    /// Write the combined corpus to `events.json`.
    async fn write_combined(&self, dataset: &CombinedDataset) -> Result<()>;

    /// Read the combined corpus, if present.
    async fn load_combined(&self) -> Result<Option<CombinedDataset>>;

    /// Write the run report to `report.json`.
    async fn write_report(&self, report: &RunReport) -> Result<()>;
}
