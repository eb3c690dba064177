//! Domain module - product identity, observations and price ledgers
//!
//! Pure types and logic; persistence is reached only through the
//! repository traits.

pub mod constants;
pub mod ledger;
pub mod observation;
pub mod product_identity;
pub mod repositories;
pub mod value_objects;

// Re-export commonly used items
pub use ledger::{Grid, GridParse, Ledger, MalformedReason, MalformedRow};
pub use observation::{FeedEntry, PriceObservation, ScrapedListing};
pub use product_identity::{ProductIdentity, canonical_row_key};
pub use repositories::{LedgerRepository, LedgerStoreError, LedgerStoreResult};
pub use value_objects::{PriceStatus, Store, UnknownStore};
