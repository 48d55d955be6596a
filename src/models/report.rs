//! Operator-facing run summary.
//!
//! A run never fails silently: every source lands here either with its
//! record count or with the error class that stopped it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one source within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    /// Source display name
    pub source: String,

    /// Whether the source produced a dataset
    pub ok: bool,

    /// Listing pages walked
    pub pages: u32,

    /// Records admitted after dedup
    pub events: usize,

    /// Detail fetches that failed (non-fatal)
    pub detail_failures: usize,

    /// Error class ("http", "challenge", "timeout", ...) when failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_class: Option<String>,

    /// Human-readable error when failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn success(source: &str, pages: u32, events: usize, detail_failures: usize) -> Self {
        Self {
            source: source.to_string(),
            ok: true,
            pages,
            events,
            detail_failures,
            error_class: None,
            error: None,
        }
    }

    pub fn failure(source: &str, error: &crate::error::AppError) -> Self {
        Self {
            source: source.to_string(),
            ok: false,
            pages: 0,
            events: 0,
            detail_failures: 0,
            error_class: Some(error.class().to_string()),
            error: Some(error.to_string()),
        }
    }
}

/// Summary of a full scrape run across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.sources.iter().filter(|s| s.ok).count()
    }

    pub fn failed(&self) -> usize {
        self.sources.len() - self.succeeded()
    }

    pub fn total_events(&self) -> usize {
        self.sources.iter().map(|s| s.events).sum()
    }

    /// Log the per-source outcome table.
    pub fn log_summary(&self) {
        log::info!(
            "Run finished: {}/{} sources succeeded, {} events total",
            self.succeeded(),
            self.sources.len(),
            self.total_events()
        );
        for source in &self.sources {
            if source.ok {
                log::info!(
                    "  {}: {} events across {} page(s){}",
                    source.source,
                    source.events,
                    source.pages,
                    if source.detail_failures > 0 {
                        format!(", {} detail fetch(es) failed", source.detail_failures)
                    } else {
                        String::new()
                    }
                );
            } else {
                log::warn!(
                    "  {}: FAILED [{}] {}",
                    source.source,
                    source.error_class.as_deref().unwrap_or("unknown"),
                    source.error.as_deref().unwrap_or("")
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_counts() {
        let report = RunReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            sources: vec![
                SourceReport::success("History", 2, 14, 0),
                SourceReport::failure(
                    "Physics",
                    &AppError::Challenge {
                        url: "https://physics.example.edu/events".to_string(),
                    },
                ),
            ],
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total_events(), 14);
        assert_eq!(
            report.sources[1].error_class.as_deref(),
            Some("challenge")
        );
    }
}
