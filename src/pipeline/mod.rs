//! Pipeline entry points for harvester operations.
//!
//! - `run_scrape`: Walk every configured source into per-source datasets
//! - `run_aggregate`: Merge stored datasets into the combined corpus

pub mod aggregate;
pub mod scrape;

pub use aggregate::run_aggregate;
pub use scrape::{run_scrape, scrape_source};
