//! Identity resolution error types
//!
//! Resolution degrades field by field; the only hard failure is input text
//! with nothing usable in it.

use thiserror::Error;

use crate::domain::Store;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("No usable product text: empty title and no path segment in '{url}'")]
    Unusable { store: Option<Store>, url: String },
}

impl ResolutionError {
    /// Create an unusable-input error for a listing
    pub fn unusable(store: Option<Store>, url: &str) -> Self {
        Self::Unusable {
            store,
            url: url.to_string(),
        }
    }

    /// Resolution failures are never retried; the observation is skipped
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }

    /// Cell text recorded when a caller still wants a mark in the ledger
    #[must_use]
    pub const fn cell_reason(&self) -> &'static str {
        match self {
            Self::Unusable { .. } => "Could not extract product info",
        }
    }
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;
