//! Price observations and the raw listings they are scraped from

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::product_identity::ProductIdentity;
use super::value_objects::{PriceStatus, Store};

/// One (product, date, price-or-status) fact produced by a scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Canonical display name of the product (brand prefix optional)
    pub identity_display: String,
    /// Cell text: a numeral, `"Out of stock"` or `"Error: ..."`
    pub price_or_status: String,
    pub store: Store,
    pub date: NaiveDate,
}

impl PriceObservation {
    pub fn new(
        identity_display: impl Into<String>,
        status: &PriceStatus,
        store: Store,
        date: NaiveDate,
    ) -> Self {
        Self {
            identity_display: identity_display.into(),
            price_or_status: status.as_cell(),
            store,
            date,
        }
    }

    /// Observation for a resolved identity
    #[must_use]
    pub fn for_identity(
        identity: &ProductIdentity,
        status: &PriceStatus,
        store: Store,
        date: NaiveDate,
    ) -> Self {
        Self::new(identity.display_name(), status, store, date)
    }
}

/// Raw text harvested from one product page by the scraping collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub store: Store,
    /// Product title element text; empty when the element was not found
    #[serde(default)]
    pub title: String,
    /// Selected variant label, if the page has one
    #[serde(default)]
    pub variant: Option<String>,
    /// Page URL, used when the title is unusable
    #[serde(default)]
    pub url: String,
}

impl ScrapedListing {
    pub fn new(
        store: Store,
        title: impl Into<String>,
        variant: Option<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            title: title.into(),
            variant,
            url: url.into(),
        }
    }
}

/// A scraped listing together with the raw price text found next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub listing: ScrapedListing,
    #[serde(default)]
    pub price_text: String,
}

impl FeedEntry {
    #[must_use]
    pub fn status(&self) -> PriceStatus {
        PriceStatus::from_scraped(&self.price_text)
    }
}
