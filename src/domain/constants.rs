//! Catalog and ledger domain constants
//!
//! Fixed vocabulary shared by identity resolution and the price ledger.

/// Product naming constants
pub mod catalog {
    /// Organization prefix every stored row label starts with
    pub const BRAND_PREFIX: &str = "Apple";

    /// Product line tokens recognized by model extraction, in canonical casing
    pub const PRODUCT_LINES: &[&str] = &["iPhone"];

    /// Qualifier suffixes in canonical spacing/casing.
    ///
    /// Ordered longest first so "Pro Max" is preferred over "Pro".
    pub const QUALIFIERS: &[&str] = &["Pro Max", "Pro", "Plus", "mini", "Max"];

    /// Non-numeric generations in canonical casing
    pub const NAMED_GENERATIONS: &[&str] = &["XR", "XS", "SE", "X"];

    /// Whole-word case corrections applied to row labels
    pub const CASE_CORRECTIONS: &[(&str, &str)] = &[
        ("apple", "Apple"),
        ("iphone", "iPhone"),
        ("xr", "XR"),
        ("xs", "XS"),
        ("se", "SE"),
        ("promax", "Pro Max"),
    ];

    /// Listing markers that never belong to a product name or color
    pub const NOISE_MARKERS: &[&str] = &["Refurbished", "Renewed", "Unboxed"];
}

/// Ledger table layout constants
pub mod ledger {
    /// First header cell of every ledger grid
    pub const HEADER_LABEL: &str = "Product";

    /// Date format of header cells
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Suffix appended to a store name to form its table name
    pub const TABLE_SUFFIX: &str = "_prices";
}

/// Cell status vocabulary
pub mod status {
    /// Cell value written when a product cannot be bought
    pub const OUT_OF_STOCK: &str = "Out of stock";

    /// Prefix of every error cell
    pub const ERROR_PREFIX: &str = "Error: ";

    /// Availability phrases that mark a listing as unavailable (lower-case)
    pub const UNAVAILABLE_PHRASES: &[&str] = &[
        "out of stock",
        "currently unavailable",
        "not available",
        "discontinued",
        "notify me",
        "sold out",
    ];

    /// Currency markers stripped from scraped price text
    pub const CURRENCY_MARKERS: &[&str] = &["Rs.", "INR", "₹", "$", "€", "£"];
}
