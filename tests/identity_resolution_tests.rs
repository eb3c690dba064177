//! Cross-store identity resolution through the public API
use price_tracker_lib::domain::{ScrapedListing, Store, canonical_row_key};
use price_tracker_lib::infrastructure::{
    ResolutionError, ResolutionStrategy, resolve, resolve_listing,
};
use rstest::rstest;

#[rstest]
#[case(Store::Amazon, "Apple iPhone 13 (128GB) - Midnight", None)]
#[case(Store::Flipkart, "APPLE iPhone 13 (Midnight, 128 GB)", None)]
#[case(
    Store::Cashify,
    "Apple iPhone iPhone 13 - Refurbished",
    Some("4 GB RAM / 128 GB, Midnight")
)]
#[case(Store::Controlz, "iphone 13", Some("128 GB | Midnight"))]
fn same_phone_gets_same_row_key_everywhere(
    #[case] store: Store,
    #[case] title: &str,
    #[case] variant: Option<&str>,
) {
    let listing = ScrapedListing::new(store, title, variant.map(ToString::to_string), "");
    let identity = resolve_listing(&listing).unwrap();
    assert_eq!(identity.row_key(), "Apple iPhone 13 (128GB)");
    assert_eq!(identity.color.as_deref(), Some("Midnight"));
}

#[test]
fn worked_example_from_a_product_page() {
    let identity = resolve("Apple iPhone 14 Pro (128 GB) - Deep Purple", None, "").unwrap();
    assert_eq!(identity.name, "iPhone 14 Pro");
    assert_eq!(identity.storage.as_deref(), Some("128GB"));
    assert_eq!(identity.color.as_deref(), Some("Deep Purple"));
    assert_eq!(identity.row_key(), "Apple iPhone 14 Pro (128GB)");
}

#[test]
fn url_slug_is_the_last_resort() {
    let identity = resolve("", None, "https://store.example/iphone-15-plus-blue").unwrap();
    assert_eq!(identity.name, "Iphone 15 Plus Blue");
    assert_eq!(identity.row_key(), "Apple iPhone 15 Plus Blue");
}

#[test]
fn nothing_usable_is_a_resolution_failure() {
    let listing = ScrapedListing::new(Store::Amazon, "   ", None, "https://store.example/");
    let err = ResolutionStrategy::from(Store::Amazon).resolve(&listing).unwrap_err();
    assert!(matches!(err, ResolutionError::Unusable { store: Some(Store::Amazon), .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn stored_labels_and_resolved_keys_agree() {
    let resolved = resolve("Apple iPhone 12 Pro Max (256 GB) - Graphite", None, "")
        .unwrap()
        .row_key();
    assert_eq!(canonical_row_key("apple iphone 12 Pro Max (256 gb)"), resolved);
    assert_eq!(canonical_row_key(&resolved), resolved);
}
