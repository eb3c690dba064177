//! # Domain Value Objects
//!
//! Immutable value types for the price tracking domain.
//! Value objects are defined by their attributes rather than identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::constants::{ledger, status};

/// Storefront a price feed comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Amazon,
    Flipkart,
    Cashify,
    Controlz,
}

impl Store {
    /// All supported storefronts
    pub const ALL: [Self; 4] = [Self::Amazon, Self::Flipkart, Self::Cashify, Self::Controlz];

    /// Display name of the storefront
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amazon => "Amazon",
            Self::Flipkart => "Flipkart",
            Self::Cashify => "Cashify",
            Self::Controlz => "Controlz",
        }
    }

    /// Name of the ledger table holding this store's history (`amazon_prices`)
    #[must_use]
    pub fn table_name(self) -> String {
        format!("{}{}", self.as_str().to_lowercase(), ledger::TABLE_SUFFIX)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown storefront name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Platform {0} is not supported (supported: amazon, flipkart, cashify, controlz)")]
pub struct UnknownStore(pub String);

impl FromStr for Store {
    type Err = UnknownStore;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|store| store.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStore(wanted.to_string()))
    }
}

/// Typed form of a ledger cell value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceStatus {
    /// Decimal numeral without currency symbol or separators
    Price(String),
    OutOfStock,
    /// Scrape failed; the reason is rendered after `"Error: "`
    Error(String),
}

impl PriceStatus {
    /// Creates an error status
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error(reason.into())
    }

    /// Converts text scraped from a price or availability element.
    ///
    /// Currency markers, thousands separators and whitespace are dropped; an
    /// all-zero fractional part is dropped too (`"₹49,999.00"` -> `"49999"`).
    #[must_use]
    pub fn from_scraped(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::error("Price not found");
        }

        let lowered = trimmed.to_lowercase();
        if status::UNAVAILABLE_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase))
        {
            return Self::OutOfStock;
        }

        let mut cleaned = trimmed.to_string();
        for marker in status::CURRENCY_MARKERS {
            cleaned = cleaned.replace(marker, "");
        }
        cleaned.retain(|c| c != ',' && !c.is_whitespace());

        match normalize_numeral(&cleaned) {
            Some(price) => Self::Price(price),
            None => Self::error(format!("Unrecognized price text: {trimmed}")),
        }
    }

    /// Parses a cell value as written by [`PriceStatus::as_cell`].
    ///
    /// Returns `None` for blank cells and for text outside the vocabulary.
    #[must_use]
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        if cell.eq_ignore_ascii_case(status::OUT_OF_STOCK) {
            return Some(Self::OutOfStock);
        }
        if let Some(reason) = cell.strip_prefix(status::ERROR_PREFIX) {
            return Some(Self::error(reason));
        }
        normalize_numeral(cell).map(Self::Price)
    }

    /// Cell text written into the ledger
    #[must_use]
    pub fn as_cell(&self) -> String {
        match self {
            Self::Price(price) => price.clone(),
            Self::OutOfStock => status::OUT_OF_STOCK.to_string(),
            Self::Error(reason) => format!("{}{reason}", status::ERROR_PREFIX),
        }
    }
}

impl fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cell())
    }
}

/// Accepts `123` or `123.45`; drops an all-zero fraction.
fn normalize_numeral(text: &str) -> Option<String> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match fraction {
        None => Some(whole.to_string()),
        Some(f) if f.is_empty() || !f.chars().all(|c| c.is_ascii_digit()) => None,
        Some(f) if f.chars().all(|c| c == '0') => Some(whole.to_string()),
        Some(f) => Some(format!("{whole}.{f}")),
    }
}
