//! Compiled text patterns for product identity extraction
//!
//! All patterns are case-insensitive where the storefronts disagree on casing.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// Product line + generation + optional qualifier, any spacing/case.
///
/// `iPhone 14 Pro`, `iphone 15 promax`, `IPHONE 13  PRO MAX`, `iPhone XR`.
pub static MODEL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(iphone)\s*(\d{1,2}|xr|xs|se|x)(?:\s*(pro\s*max|pro|plus|mini|max)\b|\b)")
});

/// Single capacity token, `128 GB` / `1TB`
pub static CAPACITY: Lazy<Regex> = Lazy::new(|| compile(r"(?i)(\d+)\s*(gb|tb)\b"));

/// RAM and storage joined by a RAM marker, `4 GB RAM / 128 GB`
pub static RAM_STORAGE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(\d+)\s*(?:gb|tb)\s*ram\s*[/|,+]\s*(\d+)\s*(gb|tb)\b"));

/// Innermost parenthesized group
pub static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| compile(r"\(([^()]*)\)"));

/// Spaced dash separating a trailing title segment, `... - Deep Purple`
pub static DASH_SEPARATOR: Lazy<Regex> = Lazy::new(|| compile(r"\s+[-–—]\s+"));

/// Separators between parts of a variant label
pub static VARIANT_SEPARATOR: Lazy<Regex> = Lazy::new(|| compile(r"[,|/]|\s+[-–—]\s+"));

/// Flipkart title form `Name (Color, 128 GB)`
pub static FLIPKART_STRUCTURED: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*([^()]+?)\s*\(\s*([^,()]+?)\s*,\s*(\d+\s*(?i:gb|tb))\s*\)")
});

/// Brand and line words repeated by Cashify titles
pub static BRANDED_LINE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bapple\s+iphone\b"));
pub static DUPLICATE_LINE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\biphone\s+iphone\b"));

/// `- Refurbished` listing suffix
pub static REFURBISHED_SUFFIX: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\s*-\s*refurbished\b"));
