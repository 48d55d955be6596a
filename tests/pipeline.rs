//! End-to-end pipeline tests over fixture HTML. No network access:
//! documents are parsed directly and pushed through extraction,
//! normalization, deduplication, and aggregation.

use chrono::NaiveDate;
use scraper::Html;
use tempfile::TempDir;

use campus_events::models::{
    Config, EventRecord, KeywordConfig, NormalizeConfig, SelectorConfig, SourceConfig,
    SourceDataset,
};
use campus_events::pipeline::run_aggregate;
use campus_events::services::dedupe::dedupe_first_wins;
use campus_events::services::{
    DateResolver, Extractor, FieldNormalizer, KeywordTable, Paginator, strategies_for,
};
use campus_events::storage::{EventStore, LocalStorage};

const LISTING_PAGE: &str = r#"
<html><body>
  <div class="view-content">
    <div class="content-list-item">
      <span class="field--name-title">
        <a href="/events/empire-and-memory">Empire and Memory: Jane Doe (Oxford University)</a>
      </span>
      <div class="field--name-field-ps-events-date">
        <span class="day">Wed, Sep 24, 2025</span>
        <span class="time">3:00 pm</span>
        <span class="time">4:20 pm</span>
      </div>
      <div class="field--name-field-ps-events-location-name">
        <div class="field__item">Dickinson Hall 211</div>
      </div>
      <div class="field--name-field-ps-summary">A lecture on imperial history.</div>
      <div class="field--name-field-ps-events-category">
        <div class="field__item">History Lecture Series</div>
      </div>
    </div>
    <div class="content-list-item">
      <span class="field--name-title">
        <a href="/events/empire-and-memory">Empire and Memory: Jane Doe (Oxford University)</a>
      </span>
      <div class="field--name-field-ps-events-date">
        <span class="day">Wed, Sep 24, 2025</span>
        <span class="time">3:00 pm</span>
        <span class="time">4:20 pm</span>
      </div>
    </div>
    <div class="content-list-item">
      <span class="field--name-title">
        <a href="/events/rivers">Colloquium: Rivers of the Anthropocene</a>
      </span>
      <div class="field--name-field-ps-events-date">
        <span class="day">Monday, November 10, 2025</span>
        <span class="time">12:00 pm</span>
      </div>
    </div>
  </div>
</body></html>"#;

fn history_source() -> SourceConfig {
    SourceConfig {
        name: "History".to_string(),
        base_url: "https://history.example.edu".to_string(),
        listing_url: "https://history.example.edu/events".to_string(),
        category: "arts_humanities".to_string(),
        default_event_type: None,
        selectors: SelectorConfig::default(),
    }
}

fn physics_source() -> SourceConfig {
    SourceConfig {
        name: "Physics".to_string(),
        base_url: "https://physics.example.edu".to_string(),
        listing_url: "https://physics.example.edu/events".to_string(),
        category: "sciences_engineering".to_string(),
        default_event_type: Some("Colloquium".to_string()),
        selectors: SelectorConfig::default(),
    }
}

fn extract_records(source: &SourceConfig, html: &str) -> Vec<EventRecord> {
    let keywords = KeywordTable::new(&KeywordConfig::default());
    let resolver = DateResolver::new(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    let rules = NormalizeConfig::default();
    let normalizer = FieldNormalizer::new(source, &keywords, &resolver, &rules).unwrap();
    let extractor = Extractor::new(&keywords);

    let doc = Html::parse_document(html);
    let candidates = extractor
        .extract_candidates(&doc, &strategies_for(source))
        .unwrap();
    candidates
        .iter()
        .filter_map(|c| normalizer.normalize(c))
        .collect()
}

#[test]
fn listing_page_to_deduplicated_records() {
    let records = extract_records(&history_source(), LISTING_PAGE);
    assert_eq!(records.len(), 3);

    let unique = dedupe_first_wins(records);
    assert_eq!(unique.len(), 2);

    let first = &unique[0];
    assert_eq!(first.start_date, "2025-09-24");
    assert_eq!(first.time, "3:00 pm - 4:20 pm");
    assert_eq!(first.location, "Dickinson Hall 211");
    assert_eq!(first.event_type, "Lecture");
    assert_eq!(first.speaker, "Jane Doe");
    assert_eq!(
        first.source_url,
        "https://history.example.edu/events/empire-and-memory"
    );

    let second = &unique[1];
    assert_eq!(second.start_date, "2025-11-10");
    assert_eq!(second.event_type, "Colloquium");
    assert_eq!(second.location, "Location TBD");
}

#[test]
fn empty_listing_yields_no_records_and_no_error() {
    let html = "<html><body><p>No events scheduled</p></body></html>";
    let records = extract_records(&history_source(), html);
    assert!(records.is_empty());
}

#[test]
fn accepted_titles_pass_quality_bounds() {
    let records = extract_records(&history_source(), LISTING_PAGE);
    for record in &records {
        assert!(record.title.chars().count() >= 6);
        assert!(!record.title.chars().all(|c| c.is_ascii_digit()));
        assert_ne!(record.title, record.title.to_uppercase());
    }
}

#[test]
fn resolved_dates_are_valid_calendar_dates() {
    let records = extract_records(&history_source(), LISTING_PAGE);
    for record in records {
        if !record.start_date.is_empty() {
            assert!(
                NaiveDate::parse_from_str(&record.start_date, "%Y-%m-%d").is_ok(),
                "invalid date {}",
                record.start_date
            );
        }
    }
}

#[test]
fn pagination_loop_terminates_at_page_cap() {
    // A pager that always advertises a next page must still halt.
    let doc = Html::parse_document(r#"<nav class="pager"><a href="?page=1">Next</a></nav>"#);
    let paginator = Paginator::new();
    let config = Config::default();

    let mut pages_walked = 0;
    for page in 1..=config.fetch.max_pages {
        pages_walked = page;
        if !paginator.has_next_page(&doc, page) {
            break;
        }
    }
    assert_eq!(pages_walked, config.fetch.max_pages);
}

#[tokio::test]
async fn aggregate_merges_sources_with_last_write_wins() {
    let tmp = TempDir::new().unwrap();
    let storage = LocalStorage::new(tmp.path());

    let history = history_source();
    let history_records = dedupe_first_wins(extract_records(&history, LISTING_PAGE));
    let history_count = history_records.len();
    storage
        .write_source(&history.slug(), &SourceDataset::new(&history, history_records))
        .await
        .unwrap();

    // A second source re-lists one of History's events with the same
    // title/date/time key; the later (sorted after "history") file wins.
    let physics = physics_source();
    let physics_records = extract_records(
        &physics,
        r#"
        <div class="content-list-item">
          <span class="field--name-title">
            <a href="/events/shared">Colloquium: Rivers of the Anthropocene</a>
          </span>
          <div class="field--name-field-ps-events-date">
            <span class="day">Monday, November 10, 2025</span>
            <span class="time">12:00 pm</span>
          </div>
        </div>"#,
    );
    assert_eq!(physics_records.len(), 1);
    storage
        .write_source(&physics.slug(), &SourceDataset::new(&physics, physics_records))
        .await
        .unwrap();

    let combined = run_aggregate(&storage).await.unwrap();
    assert_eq!(combined.metadata.files_processed, 2);
    assert_eq!(combined.metadata.successful_files, 2);
    assert_eq!(combined.metadata.deduplication_removed, 1);
    assert_eq!(combined.metadata.total_events, history_count);

    // The shared record now carries the later source's department.
    let shared = combined
        .events
        .iter()
        .find(|e| e.title == "Colloquium: Rivers of the Anthropocene")
        .unwrap();
    assert_eq!(shared.department, "Physics");

    // Events are sorted by start date.
    let dates: Vec<&str> = combined.events.iter().map(|e| e.start_date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    // Aggregation is idempotent over its own output.
    let again = run_aggregate(&storage).await.unwrap();
    assert_eq!(again.metadata.total_events, combined.metadata.total_events);
}
