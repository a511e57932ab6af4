//! # Sector Scout
//!
//! A small competitive-intelligence batch job. It reads sector news from RSS
//! feeds, keeps the articles that mention configured keywords, picks out the
//! companies they name, looks up each company's website, and scrapes public
//! contact details from it.
//!
//! ## Usage
//!
//! ```sh
//! sector_scout -c ./config -o ./data/processed
//! ```
//!
//! ## Architecture
//!
//! The run is strictly sequential:
//! 1. **Ingestion**: fetch every configured feed
//! 2. **Filtering**: fetch each article, keep keyword matches with company candidates
//! 3. **Resolution**: search for each candidate's website, dedupe by registrable domain
//! 4. **Harvesting**: probe contact pages of every company
//! 5. **Output**: write `news.csv`, `companies.csv` and `contacts.csv`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod contacts;
mod entities;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod resolver;
mod scrapers;
mod store;
#[cfg(test)]
mod test_support;
mod utils;

use cli::Cli;
use config::Config;
use entities::RegexEntityExtractor;
use fetch::HttpFetcher;
use outputs::tables::{self, ExportSummary, TableStatus};
use pipeline::{Pipeline, RunStats};
use resolver::SearchResolver;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("sector_scout starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration (fatal on error) ----
    let mut config = Config::load(&args.config_dir).await.inspect_err(|e| {
        error!(config_dir = %args.config_dir, error = %e, "Configuration could not be loaded");
    })?;
    if let Some(region) = args.region.as_deref() {
        config = config.with_region(region)?;
    }
    if let Some(delay_ms) = args.delay_ms {
        config = config.with_politeness_delay_ms(delay_ms);
    }
    println!("RSS URLs loaded: {}", config.feeds.len());
    println!("Keywords loaded: {}", config.keywords.join(", "));

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpFetcher::new(&config.settings.user_agent, config.request_timeout())?;

    // ---- Ingestion ----
    let items = scrapers::rss::fetch_feed_items(&fetcher, &config.feeds).await;
    println!("Total RSS items: {}", items.len());
    if items.is_empty() {
        println!("No items found in RSS feeds.");
        return Ok(());
    }

    // ---- Filter, resolve, harvest ----
    let resolver = SearchResolver::new(fetcher.clone(), &config.settings.search_url);
    let extractor = RegexEntityExtractor::from_config(&config);
    let report = Pipeline::new(&config, fetcher, resolver, extractor)
        .run(items)
        .await;

    // ---- Output ----
    let export = tables::write_tables(&report, &args.output_dir).await;
    print_summary(&report.stats, &export);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

fn print_summary(stats: &RunStats, export: &ExportSummary) {
    println!();
    println!("Feed items:            {}", stats.feed_items);
    println!("Skipped (no keyword):  {}", stats.skipped_no_keyword);
    println!("Dropped (no company):  {}", stats.dropped_no_entities);
    println!("Accepted articles:     {}", stats.accepted_articles);
    println!(
        "Candidates:            {} ({} unresolved, {} publishers)",
        stats.candidates, stats.unresolved, stats.publisher_rejected
    );
    println!(
        "Companies:             {} new, {} repeat sightings",
        stats.companies_inserted, stats.companies_merged
    );
    println!("Companies w/ contacts: {}", stats.contacts_with_signal);
    println!();

    for (name, status) in [
        ("news.csv", &export.news),
        ("companies.csv", &export.companies),
        ("contacts.csv", &export.contacts),
    ] {
        match status {
            TableStatus::Written { path, rows } => {
                println!("{name} written to {} ({rows} rows)", path.display())
            }
            TableStatus::Empty => println!("{name} NOT written (no rows)"),
            TableStatus::Failed(reason) => println!("{name} NOT written ({reason})"),
        }
    }
    println!();
    println!("Run complete");
}
