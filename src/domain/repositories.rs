//! Repository interfaces for price ledgers
//!
//! A ledger table is always read and written whole; there is no row-level
//! persistence primitive. Concurrent writers to the same table are not
//! supported.

use thiserror::Error;

use super::ledger::Grid;

/// Storage failures surfaced to the caller. The core never retries.
#[derive(Error, Debug)]
pub enum LedgerStoreError {
    #[error("Ledger table '{table}' could not be loaded: {source}")]
    LoadFailed {
        table: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Ledger table '{table}' could not be persisted: {source}")]
    PersistFailed {
        table: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Ledger storage is unavailable: {reason}")]
    Unavailable { reason: String },
}

impl LedgerStoreError {
    pub fn load_failed(table: &str, source: impl Into<std::io::Error>) -> Self {
        Self::LoadFailed {
            table: table.to_string(),
            source: source.into(),
        }
    }

    pub fn persist_failed(table: &str, source: impl Into<std::io::Error>) -> Self {
        Self::PersistFailed {
            table: table.to_string(),
            source: source.into(),
        }
    }

    /// Every storage failure is transient from the core's point of view
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        true
    }
}

pub type LedgerStoreResult<T> = Result<T, LedgerStoreError>;

/// Load/persist of whole ledger tables by name
pub trait LedgerRepository {
    /// Full grid of a table; a table that does not exist yet is an empty grid
    fn load(&self, table: &str) -> LedgerStoreResult<Grid>;

    /// Replaces the table's contents with `grid`
    fn persist(&self, table: &str, grid: &Grid) -> LedgerStoreResult<()>;
}

impl<R: LedgerRepository + ?Sized> LedgerRepository for &R {
    fn load(&self, table: &str) -> LedgerStoreResult<Grid> {
        (**self).load(table)
    }

    fn persist(&self, table: &str, grid: &Grid) -> LedgerStoreResult<()> {
        (**self).persist(table, grid)
    }
}
