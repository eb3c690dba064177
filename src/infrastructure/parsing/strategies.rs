//! Per-storefront resolution strategies
//!
//! Every storefront lays its product text out differently. Each strategy runs
//! a small store-specific pre-pass and then hands over to the shared
//! [`resolve`](super::identity_resolver::resolve).

use tracing::debug;

use super::identity_resolver::{color_candidate, extract_model, resolve};
use super::patterns::{BRANDED_LINE, DUPLICATE_LINE, FLIPKART_STRUCTURED, REFURBISHED_SUFFIX};
use crate::domain::product_identity::{ProductIdentity, collapse_whitespace};
use crate::domain::{ScrapedListing, Store};
use crate::infrastructure::parsing_error::{ResolutionError, ResolutionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStrategy {
    /// Title only; the product page has no variant widget
    Amazon,
    /// `Name (Color, 128 GB)` titles
    Flipkart,
    /// Title + variant label, refurbished listings
    Cashify,
    /// Title + selected variant label
    Controlz,
}

impl ResolutionStrategy {
    #[must_use]
    pub const fn for_store(store: Store) -> Self {
        match store {
            Store::Amazon => Self::Amazon,
            Store::Flipkart => Self::Flipkart,
            Store::Cashify => Self::Cashify,
            Store::Controlz => Self::Controlz,
        }
    }

    #[must_use]
    pub const fn store(self) -> Store {
        match self {
            Self::Amazon => Store::Amazon,
            Self::Flipkart => Store::Flipkart,
            Self::Cashify => Store::Cashify,
            Self::Controlz => Store::Controlz,
        }
    }

    /// Resolves a listing scraped from this strategy's storefront
    pub fn resolve(self, listing: &ScrapedListing) -> ResolutionResult<ProductIdentity> {
        let variant = listing.variant.as_deref();
        let resolved = match self {
            Self::Amazon => resolve(&listing.title, None, &listing.url),
            Self::Flipkart => match flipkart_structured(&listing.title) {
                Some(identity) => Ok(identity),
                None => resolve(&listing.title, variant, &listing.url),
            },
            Self::Cashify => resolve(&clean_cashify_title(&listing.title), variant, &listing.url),
            Self::Controlz => resolve(&listing.title, variant, &listing.url),
        };

        resolved.map_err(|err| match err {
            ResolutionError::Unusable { url, .. } => ResolutionError::Unusable {
                store: Some(self.store()),
                url,
            },
        })
    }
}

impl From<Store> for ResolutionStrategy {
    fn from(store: Store) -> Self {
        Self::for_store(store)
    }
}

/// Resolves a listing with the strategy of the store it came from
pub fn resolve_listing(listing: &ScrapedListing) -> ResolutionResult<ProductIdentity> {
    ResolutionStrategy::for_store(listing.store).resolve(listing)
}

fn flipkart_structured(title: &str) -> Option<ProductIdentity> {
    let caps = FLIPKART_STRUCTURED.captures(title)?;
    let head = collapse_whitespace(&caps[1]);
    let name = extract_model(&head).unwrap_or(head);
    let storage = caps[3].split_whitespace().collect::<String>().to_uppercase();
    let color = color_candidate(&caps[2]);

    debug!(
        "Flipkart structured title - Model: {}, Storage: {}, Color: {:?}",
        name, storage, color
    );
    Some(ProductIdentity::new(name, Some(storage), color))
}

fn clean_cashify_title(title: &str) -> String {
    let title = BRANDED_LINE.replace_all(title, "iPhone");
    let title = DUPLICATE_LINE.replace_all(&title, "iPhone");
    let title = REFURBISHED_SUFFIX.replace_all(&title, "");
    collapse_whitespace(&title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(store: Store, title: &str, variant: Option<&str>, url: &str) -> ScrapedListing {
        ScrapedListing::new(store, title, variant.map(ToString::to_string), url)
    }

    #[test]
    fn amazon_ignores_variant_text() {
        let identity = ResolutionStrategy::Amazon
            .resolve(&listing(
                Store::Amazon,
                "Apple iPhone 13 (128GB) - Midnight",
                Some("256 GB"),
                "",
            ))
            .unwrap();
        assert_eq!(identity.storage.as_deref(), Some("128GB"));
        assert_eq!(identity.color.as_deref(), Some("Midnight"));
    }

    #[test]
    fn flipkart_structured_title() {
        let identity = resolve_listing(&listing(
            Store::Flipkart,
            "Apple iPhone 15 Plus (Pink, 256 GB)",
            None,
            "https://www.flipkart.com/apple-iphone-15-plus-pink-256-gb/p/itm",
        ))
        .unwrap();
        assert_eq!(
            identity,
            ProductIdentity::new("iPhone 15 Plus", Some("256GB".into()), Some("Pink".into()))
        );
    }

    #[test]
    fn flipkart_ram_group_is_not_a_color() {
        let identity = resolve_listing(&listing(
            Store::Flipkart,
            "Apple iPhone 13 (4 GB RAM, 128 GB)",
            None,
            "",
        ))
        .unwrap();
        assert_eq!(identity, ProductIdentity::new("iPhone 13", Some("128GB".into()), None));
    }

    #[test]
    fn cashify_title_is_cleaned_before_resolution() {
        assert_eq!(
            clean_cashify_title("Apple iPhone iPhone 13 Pro - Refurbished"),
            "iPhone 13 Pro"
        );

        let identity = resolve_listing(&listing(
            Store::Cashify,
            "Apple iPhone 12 - Refurbished",
            Some("4 GB RAM / 64 GB, Black"),
            "",
        ))
        .unwrap();
        assert_eq!(identity.row_key(), "Apple iPhone 12 (64GB)");
        assert_eq!(identity.color.as_deref(), Some("Black"));
    }

    #[test]
    fn controlz_uses_selected_variant() {
        let identity = resolve_listing(&listing(
            Store::Controlz,
            "Refurbished Apple iPhone 11",
            Some("128 GB"),
            "https://controlz.world/products/refurbished-apple-iphone-11",
        ))
        .unwrap();
        assert_eq!(identity.row_key(), "Apple iPhone 11 (128GB)");
    }

    #[test]
    fn failures_carry_the_store() {
        let err = resolve_listing(&listing(Store::Controlz, "", None, "")).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::Unusable {
                store: Some(Store::Controlz),
                url: String::new(),
            }
        );
    }
}
