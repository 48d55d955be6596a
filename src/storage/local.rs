//! Local filesystem storage implementation.
//!
//! Writes JSON atomically (temp file + rename) so a crash mid-write never
//! leaves a half-written dataset behind for the aggregator to trip on.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CombinedDataset, RunReport, SourceDataset};
use crate::storage::{EventStore, ScanOutcome, StoredDataset};

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EventStore for LocalStorage {
    async fn write_source(&self, slug: &str, dataset: &SourceDataset) -> Result<()> {
        self.write_json(&format!("sources/{slug}.json"), dataset)
            .await
    }

    async fn scan_sources(&self) -> Result<ScanOutcome> {
        let dir = self.path("sources");
        let mut outcome = ScanOutcome::default();

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(outcome),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Sorted order makes the corpus merge deterministic.
        paths.sort();

        for path in paths {
            outcome.files_processed += 1;
            let slug = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();

            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<SourceDataset>(&bytes) {
                Ok(dataset) => {
                    outcome.successful_files += 1;
                    outcome.datasets.push(StoredDataset { slug, dataset });
                }
                Err(e) => {
                    log::warn!("Skipping unreadable dataset {}: {}", path.display(), e);
                }
            }
        }

        Ok(outcome)
    }

    async fn write_combined(&self, dataset: &CombinedDataset) -> Result<()> {
        self.write_json("events.json", dataset).await
    }

    async fn load_combined(&self) -> Result<Option<CombinedDataset>> {
        self.read_json("events.json").await
    }

    async fn write_report(&self, report: &RunReport) -> Result<()> {
        self.write_json("report.json", report).await
    }
}
