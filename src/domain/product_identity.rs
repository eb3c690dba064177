//! Canonical product identity and row-key rendering
//!
//! A `ProductIdentity` is built fresh for every scrape attempt and folded into
//! a display string; only that string is ever persisted.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::constants::catalog;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

static WORD: Lazy<Regex> = Lazy::new(|| compile(r"[A-Za-z]+"));

static CAPACITY_GROUP: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\s*\(\s*(\d+)\s*(gb|tb)\s*\)"));

/// Canonical identity of one physical product variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductIdentity {
    /// Product line label, e.g. `iPhone 14 Pro`
    pub name: String,
    /// Capacity token, e.g. `256GB`
    pub storage: Option<String>,
    /// Free-text finish label as found on the page
    pub color: Option<String>,
}

impl ProductIdentity {
    pub fn new(name: impl Into<String>, storage: Option<String>, color: Option<String>) -> Self {
        Self {
            name: name.into(),
            storage,
            color,
        }
    }

    /// `"<name> (<storage>)"`, or the bare name when storage is unknown.
    ///
    /// A `(<color>)` group inside the name is dropped.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = self.name.clone();
        if let Some(color) = self.color.as_deref().filter(|c| !c.is_empty()) {
            name = name.replace(&format!("({color})"), " ");
        }
        let name = collapse_whitespace(&name);

        match self.storage.as_deref() {
            Some(storage) => format!("{name} ({storage})"),
            None => name,
        }
    }

    /// Final ledger row label for this identity
    #[must_use]
    pub fn row_key(&self) -> String {
        canonical_row_key(&self.display_name())
    }
}

impl fmt::Display for ProductIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Normalizes a display name or a stored row label into a ledger row key.
///
/// Applies the fixed case-correction table, moves a parenthesized capacity
/// group to the end in `(<digits><UNIT>)` form and prepends the brand prefix.
/// Idempotent: `canonical_row_key(&canonical_row_key(x)) == canonical_row_key(x)`.
#[must_use]
pub fn canonical_row_key(label: &str) -> String {
    // Removal can expose a new group ("(1(2gb)gb)"), so strip to a fixpoint.
    // The last group seen wins.
    let mut stripped = collapse_whitespace(label);
    let mut storage = None;
    while let Some(caps) = CAPACITY_GROUP.captures_iter(&stripped).last() {
        storage = Some(format!("{}{}", &caps[1], caps[2].to_uppercase()));
        stripped = CAPACITY_GROUP.replace_all(&stripped, " ").into_owned();
    }

    let mut key = WORD
        .replace_all(&stripped, |caps: &Captures<'_>| {
            let word = &caps[0];
            catalog::CASE_CORRECTIONS
                .iter()
                .find(|(from, _)| word.eq_ignore_ascii_case(from))
                .map_or_else(|| word.to_string(), |(_, to)| (*to).to_string())
        })
        .into_owned();
    if let Some(storage) = storage {
        key = format!("{key} ({storage})");
    }

    if key.split_whitespace().next() != Some(catalog::BRAND_PREFIX) {
        key = format!("{} {key}", catalog::BRAND_PREFIX);
    }

    collapse_whitespace(&key)
}

/// Collapses runs of whitespace to one space and trims the ends
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
