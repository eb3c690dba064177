//! Product text parsing infrastructure
//!
//! Turns the free text scraped from a storefront page (title, variant label,
//! URL) into a [`ProductIdentity`](crate::domain::ProductIdentity).

pub mod identity_resolver;
pub mod patterns;
pub mod strategies;

// Re-export public types
pub use identity_resolver::{extract_color, extract_model, extract_storage, resolve};
pub use strategies::{ResolutionStrategy, resolve_listing};
