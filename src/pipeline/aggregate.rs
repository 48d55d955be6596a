// src/pipeline/aggregate.rs

//! Corpus aggregation.
//!
//! Combines every per-source dataset into one consolidated corpus:
//! cross-source last-write-wins deduplication, per-department statistics,
//! and corpus metadata the downstream site reads.

use chrono::Utc;

use crate::error::Result;
use crate::models::{CombinedDataset, CorpusMeta, DepartmentStat, EventRecord};
use crate::services::dedupe::merge_last_wins;
use crate::storage::EventStore;

/// Aggregate all stored source datasets into `events.json`.
pub async fn run_aggregate(storage: &dyn EventStore) -> Result<CombinedDataset> {
    let scan = storage.scan_sources().await?;
    log::info!(
        "Aggregating {} dataset(s) ({} file(s) scanned)",
        scan.successful_files,
        scan.files_processed
    );

    let batches: Vec<Vec<EventRecord>> = scan
        .datasets
        .into_iter()
        .map(|stored| stored.dataset.events)
        .collect();
    let total_before: usize = batches.iter().map(Vec::len).sum();

    let (mut events, removed) = merge_last_wins(batches);
    events.sort_by(|a, b| a.start_date.cmp(&b.start_date));

    let departments = department_stats(&events);
    let combined = CombinedDataset {
        metadata: CorpusMeta {
            total_events: events.len(),
            total_departments: departments.len(),
            files_processed: scan.files_processed,
            successful_files: scan.successful_files,
            deduplication_removed: removed,
            aggregated_at: Utc::now(),
        },
        departments,
        events,
    };

    storage.write_combined(&combined).await?;
    log::info!(
        "Corpus: {} events from {} department(s), {} duplicate(s) removed of {} input record(s)",
        combined.metadata.total_events,
        combined.metadata.total_departments,
        removed,
        total_before
    );

    Ok(combined)
}

/// Per-department event counts, in first-seen order.
fn department_stats(events: &[EventRecord]) -> Vec<DepartmentStat> {
    let mut stats: Vec<DepartmentStat> = Vec::new();
    for event in events {
        match stats.iter_mut().find(|s| s.name == event.department) {
            Some(stat) => stat.event_count += 1,
            None => stats.push(DepartmentStat {
                name: event.department.clone(),
                meta_category: event.meta_category.clone(),
                event_count: 1,
            }),
        }
    }
    stats
}
