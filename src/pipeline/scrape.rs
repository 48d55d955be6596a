// src/pipeline/scrape.rs

//! Per-source scraping pipeline.
//!
//! Walks each source's listing pages through the extraction cascade,
//! normalizes candidates into records, optionally enriches them from
//! detail pages, and deduplicates the result. Sources are isolated: one
//! failing never stops the others, and every source ends up in the run
//! report either way.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{Config, EventRecord, RunReport, SourceConfig, SourceDataset, SourceReport};
use crate::services::dedupe::dedupe_first_wins;
use crate::services::{
    DateResolver, DetailFetcher, Extractor, FieldNormalizer, Fetcher, KeywordTable, Paginator,
    strategies_for,
};
use crate::storage::EventStore;

/// Result of scraping one source.
pub struct SourceOutcome {
    pub dataset: SourceDataset,
    pub pages: u32,
    pub detail_failures: usize,
}

/// Scrape every source with bounded concurrency and write the datasets.
pub async fn run_scrape(
    config: &Config,
    sources: &[SourceConfig],
    storage: &dyn EventStore,
    reference: NaiveDate,
) -> Result<RunReport> {
    let started_at = Utc::now();
    let fetcher = Fetcher::new(&config.fetch)?;
    let keywords = KeywordTable::new(&config.keywords);
    let resolver = DateResolver::new(reference);
    let deadline = Duration::from_secs(config.fetch.source_deadline_secs);
    let concurrency = config.fetch.max_concurrent.max(1);

    let mut source_stream = stream::iter(sources)
        .map(|source| {
            let fetcher = &fetcher;
            let keywords = &keywords;
            let resolver = &resolver;
            async move {
                log::info!("Scraping {} from {}", source.name, source.listing_url);
                let result = match tokio::time::timeout(
                    deadline,
                    scrape_source(config, source, fetcher, keywords, resolver),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(AppError::Deadline(source.name.clone())),
                };
                (source, result)
            }
        })
        .buffer_unordered(concurrency);

    let mut reports = Vec::new();
    while let Some((source, result)) = source_stream.next().await {
        match result {
            Ok(outcome) => {
                storage.write_source(&source.slug(), &outcome.dataset).await?;
                log::info!(
                    "{}: {} events across {} page(s)",
                    source.name,
                    outcome.dataset.events.len(),
                    outcome.pages
                );
                reports.push(SourceReport::success(
                    &source.name,
                    outcome.pages,
                    outcome.dataset.events.len(),
                    outcome.detail_failures,
                ));
            }
            Err(error) => {
                log::warn!("{} failed: {}", source.name, error);
                reports.push(SourceReport::failure(&source.name, &error));
            }
        }
    }

    // buffer_unordered yields in completion order; report in config order.
    let positions: HashMap<&str, usize> = sources
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.name.as_str(), idx))
        .collect();
    reports.sort_by_key(|r| positions.get(r.source.as_str()).copied().unwrap_or(usize::MAX));

    let report = RunReport {
        started_at,
        finished_at: Utc::now(),
        sources: reports,
    };
    storage.write_report(&report).await?;
    report.log_summary();

    Ok(report)
}

/// Walk one source's listing pages to a deduplicated dataset.
pub async fn scrape_source(
    config: &Config,
    source: &SourceConfig,
    fetcher: &Fetcher,
    keywords: &KeywordTable,
    resolver: &DateResolver,
) -> Result<SourceOutcome> {
    let strategies = strategies_for(source);
    let extractor = Extractor::new(keywords);
    let normalizer = FieldNormalizer::new(source, keywords, resolver, &config.normalize)?;
    let detail = DetailFetcher::new(source, fetcher, resolver)?;
    let paginator = Paginator::new();
    let delay = Duration::from_millis(config.fetch.request_delay_ms);

    let mut records: Vec<EventRecord> = Vec::new();
    let mut pages_walked = 0;
    let mut detail_failures = 0;

    // The page cap bounds the loop no matter what the pager claims.
    for page in 1..=config.fetch.max_pages {
        let url = paginator.page_url(&source.listing_url, page);
        let raw = match fetcher.fetch(&url).await {
            Ok(raw) => raw,
            Err(error) if page > 1 => {
                // Keep what earlier pages produced.
                log::warn!(
                    "{}: page {} failed ({}), keeping {} record(s) so far",
                    source.name,
                    page,
                    error,
                    records.len()
                );
                break;
            }
            Err(error) => return Err(error),
        };
        pages_walked = page;

        // Parse and extract synchronously so the document never lives
        // across an await point.
        let (page_records, has_next) = {
            let doc = Html::parse_document(&raw.body);
            let candidates = extractor.extract_candidates(&doc, &strategies)?;
            log::debug!(
                "{}: page {} produced {} candidate(s)",
                source.name,
                page,
                candidates.len()
            );
            if candidates.is_empty() {
                // "No events scheduled" is a legitimate terminal state.
                (Vec::new(), false)
            } else {
                let page_records: Vec<EventRecord> = candidates
                    .iter()
                    .filter_map(|c| normalizer.normalize(c))
                    .collect();
                (page_records, paginator.has_next_page(&doc, page))
            }
        };

        if page_records.is_empty() && !has_next {
            break;
        }

        for mut record in page_records {
            if config.fetch.fetch_details && detail.applies_to(&record) {
                tokio::time::sleep(delay).await;
                match detail.enrich(&record).await {
                    Ok(fields) => record.merge_details(fields),
                    Err(error) => {
                        detail_failures += 1;
                        log::warn!(
                            "{}: detail fetch failed for '{}': {}",
                            source.name,
                            record.title,
                            error
                        );
                    }
                }
            }
            records.push(record);
        }

        if !has_next {
            break;
        }
        tokio::time::sleep(delay).await;
    }

    let mut unique = dedupe_first_wins(records);
    unique.sort_by(|a, b| a.start_date.cmp(&b.start_date));

    Ok(SourceOutcome {
        dataset: SourceDataset::new(source, unique),
        pages: pages_walked,
        detail_failures,
    })
}
