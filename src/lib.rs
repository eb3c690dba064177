//! Price Tracker - daily smartphone price ledgers for online storefronts
//!
//! Scraped product text is resolved into a canonical product identity and
//! the observed price is merged into a per-store ledger of product rows by
//! date columns.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-export the types most callers need
pub use application::{LedgerError, PriceRecorder, RecordOutcome};
pub use domain::{Ledger, PriceObservation, PriceStatus, ProductIdentity, ScrapedListing, Store};
