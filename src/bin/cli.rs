//! campus-events CLI
//!
//! Local execution entry point for scraping and aggregating department
//! event listings.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use campus_events::{
    config::{load_all, load_config},
    error::{AppError, Result},
    pipeline,
    storage::{EventStore, LocalStorage},
};

/// campus-events - University Event Harvester
#[derive(Parser, Debug)]
#[command(
    name = "campus-events",
    version,
    about = "Harvests department event listings into one normalized dataset"
)]
struct Cli {
    /// Path to storage directory containing config files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape all configured sources into per-source datasets
    Scrape {
        /// Scrape only the source with this name
        #[arg(long)]
        source: Option<String>,

        /// Skip detail-page fetches
        #[arg(long)]
        no_details: bool,

        /// Reference date for year inference (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Merge stored datasets into the combined corpus
    Aggregate,

    /// Run full pipeline: Scrape then Aggregate
    Pipeline {
        /// Reference date for year inference (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Validate configuration files
    Validate,

    /// Show current dataset info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("campus-events starting...");

    let storage = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Scrape {
            source,
            no_details,
            as_of,
        } => {
            let (mut config, sources) = load_all(&cli.storage_dir)?;
            if no_details {
                config.fetch.fetch_details = false;
            }

            let selected = match &source {
                Some(name) => {
                    let selected: Vec<_> = sources
                        .sources
                        .iter()
                        .filter(|s| s.name.eq_ignore_ascii_case(name))
                        .cloned()
                        .collect();
                    if selected.is_empty() {
                        return Err(AppError::config(format!("Unknown source '{name}'")));
                    }
                    selected
                }
                None => sources.sources,
            };

            let reference = as_of.unwrap_or_else(|| Local::now().date_naive());
            pipeline::run_scrape(&config, &selected, &storage, reference).await?;
        }

        Command::Aggregate => {
            pipeline::run_aggregate(&storage).await?;
        }

        Command::Pipeline { as_of } => {
            let (config, sources) = load_all(&cli.storage_dir)?;
            let reference = as_of.unwrap_or_else(|| Local::now().date_naive());

            log::info!("Step 1/2: Scraping {} source(s)...", sources.sources.len());
            pipeline::run_scrape(&config, &sources.sources, &storage, reference).await?;

            log::info!("Step 2/2: Aggregating datasets...");
            pipeline::run_aggregate(&storage).await?;

            log::info!("Pipeline complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            let (_, sources) = load_all(&cli.storage_dir)?;
            log::info!("✓ Config OK");
            log::info!("✓ Sources OK ({} defined)", sources.sources.len());

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let config = load_config(&cli.storage_dir);
            log::info!(
                "Fetch: {} page(s) max, {} ms delay, details: {}",
                config.fetch.max_pages,
                config.fetch.request_delay_ms,
                config.fetch.fetch_details
            );

            match storage.load_combined().await? {
                Some(combined) => {
                    log::info!(
                        "Corpus: {} events from {} department(s), aggregated at {}",
                        combined.metadata.total_events,
                        combined.metadata.total_departments,
                        combined.metadata.aggregated_at
                    );
                    for dept in &combined.departments {
                        log::info!("  {}: {} events", dept.name, dept.event_count);
                    }
                }
                None => log::info!("No combined dataset yet. Run 'aggregate' first."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
