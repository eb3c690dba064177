//! `price-tracker` - records one day of scraped prices into the store ledgers
//!
//! Reads the configured feed file (a JSON array of scraped listings with their
//! raw price text) and merges every entry into `<store>_prices` under today's
//! date.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};

use price_tracker_lib::domain::FeedEntry;
use price_tracker_lib::infrastructure::{
    ConfigManager, CsvLedgerRepository, init_logging_with_config, log_system_info,
};
use price_tracker_lib::{PriceRecorder, RecordOutcome};

#[derive(Debug, Default)]
struct RunSummary {
    recorded: usize,
    skipped: usize,
    failed: usize,
}

fn read_feed(path: &Path) -> Result<Vec<FeedEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse feed file {}", path.display()))
}

fn main() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager
        .load_config()
        .with_context(|| format!("Failed to load {}", manager.config_path().display()))?;

    let log_dir = config.log_dir();
    init_logging_with_config(&config.logging, &log_dir)?;
    log_system_info(&config.ledger.data_dir, &log_dir);

    let feed_path = &config.ingest.feed_path;
    if !feed_path.exists() {
        warn!("No feed file at {}, nothing to record", feed_path.display());
        return Ok(());
    }
    let entries = read_feed(feed_path)?;
    info!("🚀 Recording {} listings from {}", entries.len(), feed_path.display());

    let recorder = PriceRecorder::new(CsvLedgerRepository::new(&config.ledger.data_dir));
    let today = Local::now().date_naive();
    let mut summary = RunSummary::default();

    for entry in &entries {
        match recorder.record_listing(&entry.listing, &entry.status(), today) {
            Ok(RecordOutcome::Recorded { .. }) => summary.recorded += 1,
            Ok(RecordOutcome::Skipped { .. }) => summary.skipped += 1,
            Err(e) => {
                error!(
                    "❌ Failed to record {} listing {:?}: {}",
                    entry.listing.store, entry.listing.title, e
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        "📊 Done for {}: {} recorded, {} skipped, {} failed",
        today, summary.recorded, summary.skipped, summary.failed
    );
    println!(
        "{} recorded, {} skipped, {} failed",
        summary.recorded, summary.skipped, summary.failed
    );
    Ok(())
}
