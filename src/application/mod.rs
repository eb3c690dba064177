//! Application layer - Use cases and application services
//!
//! Coordinates identity resolution and ledger persistence for each scraped
//! observation.

pub mod price_recorder;

// Re-export commonly used items
pub use price_recorder::{LedgerError, PriceRecorder, RecordOutcome};
