//! Service layer for the event harvester.
//!
//! This module contains the pipeline's working parts:
//! - HTTP fetching with challenge detection (`Fetcher`)
//! - Candidate container extraction (`Extractor`)
//! - Field normalization (`FieldNormalizer`)
//! - Date/time resolution (`DateResolver`)
//! - Pagination detection (`Paginator`)
//! - Detail-page enrichment (`DetailFetcher`)
//! - Deduplication (`dedupe`)
//! - Shared keyword tables (`KeywordTable`)

pub mod dates;
pub mod dedupe;
pub mod detail;
pub mod extract;
pub mod fetcher;
pub mod keywords;
pub mod normalize;
pub mod pagination;

pub use dates::DateResolver;
pub use detail::DetailFetcher;
pub use extract::{Candidate, Extractor, Strategy, strategies_for};
pub use fetcher::Fetcher;
pub use keywords::KeywordTable;
pub use normalize::FieldNormalizer;
pub use pagination::Paginator;
