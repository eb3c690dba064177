//! Price recording use case
//!
//! Resolves a scraped listing, then runs the load → merge → persist cycle on
//! the store's ledger table. One observation is processed end to end before
//! the next; nothing is retried here.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    Ledger, LedgerRepository, LedgerStoreError, PriceObservation, PriceStatus, ScrapedListing,
    canonical_row_key,
};
use crate::infrastructure::parsing::resolve_listing;

/// Failures that reach the caller of [`PriceRecorder`]
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] LedgerStoreError),
}

impl LedgerError {
    /// The caller may retry the same observation later
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
        }
    }
}

/// What happened to one observation or listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The table now holds the observation under `row_key`
    Recorded { row_key: String, table: String },
    /// Nothing was written; the input must not be retried
    Skipped { reason: String },
}

impl RecordOutcome {
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

pub struct PriceRecorder<R: LedgerRepository> {
    repository: R,
}

impl<R: LedgerRepository> PriceRecorder<R> {
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Merge one observation into its store's table and persist the result
    pub fn record(&self, observation: &PriceObservation) -> Result<RecordOutcome, LedgerError> {
        let table = observation.store.table_name();
        let stored = self.repository.load(&table)?;

        let parse = Ledger::parse_grid(&stored);
        if !parse.skipped.is_empty() {
            warn!(
                "⚠️ {} malformed rows in '{}' will not be carried over",
                parse.skipped.len(),
                table
            );
        }

        let row_key = canonical_row_key(&observation.identity_display);
        let ledger = parse.ledger.upsert(observation);
        self.repository.persist(&table, &ledger.to_grid())?;

        info!(
            "✓ Updated price for {} in {}: {} ({})",
            row_key, table, observation.price_or_status, observation.date
        );
        Ok(RecordOutcome::Recorded { row_key, table })
    }

    /// Resolve a scraped listing with its store's strategy and record its status
    pub fn record_listing(
        &self,
        listing: &ScrapedListing,
        status: &PriceStatus,
        date: NaiveDate,
    ) -> Result<RecordOutcome, LedgerError> {
        let identity = match resolve_listing(listing) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("✗ Skipping {} listing: {}", listing.store, e);
                return Ok(RecordOutcome::Skipped {
                    reason: e.cell_reason().to_string(),
                });
            }
        };

        let observation = PriceObservation::for_identity(&identity, status, listing.store, date);
        self.record(&observation)
    }

    /// Record observations one after another; a failure never stops the rest
    pub fn record_batch(
        &self,
        observations: &[PriceObservation],
    ) -> Vec<Result<RecordOutcome, LedgerError>> {
        observations
            .iter()
            .map(|observation| {
                let result = self.record(observation);
                if let Err(e) = &result {
                    warn!(
                        "✗ Failed to record {} for {}: {}",
                        observation.identity_display, observation.store, e
                    );
                }
                result
            })
            .collect()
    }
}
