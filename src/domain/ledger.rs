//! # Price Ledger
//!
//! Sparse wide table of one store's price history: rows are canonical product
//! labels, columns are calendar dates, cells are price-or-status strings.
//!
//! The ledger is loaded in full from a rectangular grid, changed by exactly one
//! observation through [`Ledger::upsert`], and rendered back in full with
//! [`Ledger::to_grid`]. Rows keep first-encounter order; columns are always in
//! ascending date order.

use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

use super::constants::ledger::{DATE_FORMAT, HEADER_LABEL};
use super::observation::PriceObservation;
use super::product_identity::canonical_row_key;
use super::value_objects::PriceStatus;

/// Rectangular table as exchanged with the persistence layer
pub type Grid = Vec<Vec<String>>;

/// Per-product history: date -> cell text
pub type PriceHistory = BTreeMap<NaiveDate, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    rows: IndexMap<String, PriceHistory>,
    dates: BTreeSet<NaiveDate>,
}

/// Why a stored row was left out of the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// First cell is missing or blank
    MissingProductLabel,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProductLabel => f.write_str("row has no product label"),
        }
    }
}

/// A stored row skipped while reading a grid. Recovered locally, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based row number in the grid, header included
    pub row_number: usize,
    pub reason: MalformedReason,
}

/// Result of reading a stored grid
#[derive(Debug, Clone, Default)]
pub struct GridParse {
    pub ledger: Ledger,
    /// Rows that were skipped
    pub skipped: Vec<MalformedRow>,
    /// Header cells that are not `YYYY-MM-DD` dates; their columns are ignored
    pub ignored_columns: Vec<String>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a stored grid, recovering from malformed content.
    #[must_use]
    pub fn from_grid(grid: &[Vec<String>]) -> Self {
        Self::parse_grid(grid).ledger
    }

    /// Reads a stored grid and reports what had to be skipped.
    ///
    /// - header cells that are not dates drop their column
    /// - rows shorter than the header have no observation for the missing dates
    /// - rows without a product label are skipped
    /// - rows whose labels canonicalize to the same key are merged into the
    ///   first one, later non-empty cells winning
    #[must_use]
    pub fn parse_grid(grid: &[Vec<String>]) -> GridParse {
        let mut parse = GridParse::default();
        let Some((header, body)) = grid.split_first() else {
            return parse;
        };

        if header.first().map(|h| h.trim()) != Some(HEADER_LABEL) {
            warn!(
                "Unexpected ledger header label {:?}, reading the table anyway",
                header.first()
            );
        }

        let columns: Vec<Option<NaiveDate>> = header
            .iter()
            .skip(1)
            .map(|cell| {
                let date = NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT).ok();
                if date.is_none() {
                    warn!("Ignoring non-date ledger column {:?}", cell);
                    parse.ignored_columns.push(cell.clone());
                }
                date
            })
            .collect();
        parse.ledger.dates.extend(columns.iter().flatten());

        for (index, row) in body.iter().enumerate() {
            let row_number = index + 2;
            let label = row.first().map_or("", |l| l.trim());
            if label.is_empty() {
                warn!("Skipping ledger row {}: no product label", row_number);
                parse.skipped.push(MalformedRow {
                    row_number,
                    reason: MalformedReason::MissingProductLabel,
                });
                continue;
            }

            if row.len() > header.len() {
                debug!(
                    "Ledger row {} has {} cells beyond the header, ignoring them",
                    row_number,
                    row.len() - header.len()
                );
            }

            let history = parse.ledger.rows.entry(canonical_row_key(label)).or_default();
            for (cell, date) in row.iter().skip(1).zip(&columns) {
                if let Some(date) = date {
                    if cell.trim().is_empty() {
                        continue;
                    }
                    if PriceStatus::from_cell(cell).is_none() {
                        debug!(
                            "Ledger row {} keeps unrecognized cell {:?} on {}",
                            row_number, cell, date
                        );
                    }
                    history.insert(*date, cell.clone());
                }
            }
        }

        parse
    }

    /// Merges one observation, returning the updated ledger.
    ///
    /// The row key is the canonical form of `identity_display`; a new key is
    /// appended after all existing rows. A value already stored for the same
    /// date is overwritten.
    #[must_use]
    pub fn upsert(mut self, observation: &PriceObservation) -> Self {
        let key = canonical_row_key(&observation.identity_display);
        self.rows
            .entry(key)
            .or_default()
            .insert(observation.date, observation.price_or_status.clone());
        self.dates.insert(observation.date);
        self
    }

    /// Renders the complete rectangle: header first, every row exposing every
    /// date column, `""` where nothing was observed.
    #[must_use]
    pub fn to_grid(&self) -> Grid {
        let mut header = Vec::with_capacity(self.dates.len() + 1);
        header.push(HEADER_LABEL.to_string());
        header.extend(self.dates.iter().map(|d| d.format(DATE_FORMAT).to_string()));

        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(header);
        for (key, history) in &self.rows {
            let mut row = Vec::with_capacity(self.dates.len() + 1);
            row.push(key.clone());
            row.extend(
                self.dates
                    .iter()
                    .map(|date| history.get(date).cloned().unwrap_or_default()),
            );
            grid.push(row);
        }
        grid
    }

    /// Row keys in encounter order
    pub fn row_keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Date columns in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// History of one product; the label is canonicalized before lookup
    #[must_use]
    pub fn history(&self, label: &str) -> Option<&PriceHistory> {
        self.rows.get(&canonical_row_key(label))
    }

    /// Cell for one product and date; the label is canonicalized before lookup
    #[must_use]
    pub fn get(&self, label: &str, date: NaiveDate) -> Option<&str> {
        self.history(label)
            .and_then(|history| history.get(&date))
            .map(String::as_str)
    }

    /// Number of product rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{PriceStatus, Store};
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    fn obs(display: &str, day: &str, cell: &str) -> PriceObservation {
        PriceObservation {
            identity_display: display.to_string(),
            price_or_status: cell.to_string(),
            store: Store::Amazon,
            date: date(day),
        }
    }

    #[test]
    fn upsert_adds_new_date_column() {
        let stored = grid(&[
            &["Product", "2025-01-01"],
            &["Apple iPhone 13 (128GB)", "49999"],
        ]);
        let ledger = Ledger::from_grid(&stored)
            .upsert(&obs("Apple iPhone 13 (128GB)", "2025-01-02", "48999"));

        assert_eq!(
            ledger.to_grid(),
            grid(&[
                &["Product", "2025-01-01", "2025-01-02"],
                &["Apple iPhone 13 (128GB)", "49999", "48999"],
            ])
        );
    }

    #[test]
    fn new_rows_are_appended_and_padded() {
        let stored = grid(&[
            &["Product", "2025-01-01"],
            &["Apple iPhone 13 (128GB)", "49999"],
        ]);
        let ledger = Ledger::from_grid(&stored)
            .upsert(&obs("iPhone 15 (256GB)", "2025-01-03", "Out of stock"));

        assert_eq!(
            ledger.to_grid(),
            grid(&[
                &["Product", "2025-01-01", "2025-01-03"],
                &["Apple iPhone 13 (128GB)", "49999", ""],
                &["Apple iPhone 15 (256GB)", "", "Out of stock"],
            ])
        );
    }

    #[test]
    fn same_day_write_overwrites() {
        let ledger = Ledger::new()
            .upsert(&obs("iPhone 14", "2025-02-01", "Out of stock"))
            .upsert(&obs("iPhone 14", "2025-02-01", "59999"));
        assert_eq!(ledger.get("Apple iPhone 14", date("2025-02-01")), Some("59999"));
        assert_eq!(ledger.dates().count(), 1);
    }

    #[test]
    fn columns_are_sorted_even_when_written_out_of_order() {
        let ledger = Ledger::new()
            .upsert(&obs("iPhone 14", "2025-03-10", "1"))
            .upsert(&obs("iPhone 14", "2024-12-31", "2"))
            .upsert(&obs("iPhone 14", "2025-01-15", "3"));
        let header = &ledger.to_grid()[0];
        assert_eq!(header, &["Product", "2024-12-31", "2025-01-15", "2025-03-10"]);
    }

    #[test]
    fn non_date_header_columns_are_ignored() {
        let stored = grid(&[
            &["Product", "notes", "2025-01-01"],
            &["Apple iPhone 13 (128GB)", "cheap", "49999"],
        ]);
        let parse = Ledger::parse_grid(&stored);
        assert_eq!(parse.ignored_columns, vec!["notes".to_string()]);
        assert!(parse.skipped.is_empty());
        assert_eq!(
            parse.ledger.to_grid(),
            grid(&[
                &["Product", "2025-01-01"],
                &["Apple iPhone 13 (128GB)", "49999"],
            ])
        );
    }

    #[test]
    fn short_rows_keep_the_cells_they_have() {
        let stored = grid(&[
            &["Product", "2025-01-01", "2025-01-02"],
            &["Apple iPhone 13 (128GB)", "49999"],
            &["Apple iPhone 12 (64GB)"],
        ]);
        let ledger = Ledger::from_grid(&stored);
        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.to_grid(),
            grid(&[
                &["Product", "2025-01-01", "2025-01-02"],
                &["Apple iPhone 13 (128GB)", "49999", ""],
                &["Apple iPhone 12 (64GB)", "", ""],
            ])
        );
    }

    #[test]
    fn rows_without_label_are_skipped_not_fatal() {
        let stored = grid(&[
            &["Product", "2025-01-01"],
            &["", "123"],
            &[],
            &["Apple iPhone 13 (128GB)", "49999"],
        ]);
        let parse = Ledger::parse_grid(&stored);
        assert_eq!(parse.ledger.len(), 1);
        assert_eq!(
            parse.skipped,
            vec![
                MalformedRow { row_number: 2, reason: MalformedReason::MissingProductLabel },
                MalformedRow { row_number: 3, reason: MalformedReason::MissingProductLabel },
            ]
        );
    }

    #[test]
    fn legacy_labels_merge_into_one_row() {
        let stored = grid(&[
            &["Product", "2025-01-01", "2025-01-02"],
            &["iPhone 13 (128 GB)", "49999", ""],
            &["Apple iphone 13 (128GB)", "", "48999"],
        ]);
        let ledger = Ledger::from_grid(&stored);
        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.to_grid()[1],
            vec!["Apple iPhone 13 (128GB)", "49999", "48999"]
        );
    }

    #[test]
    fn unrecognized_cells_are_kept_verbatim() {
        let stored = grid(&[
            &["Product", "2025-01-01", "2025-01-02"],
            &["Apple iPhone 12 (64GB)", "n/a", "Out of Stock"],
        ]);
        let ledger = Ledger::from_grid(&stored);
        let label = "Apple iPhone 12 (64GB)";
        assert_eq!(ledger.get(label, date("2025-01-01")), Some("n/a"));
        assert_eq!(ledger.get(label, date("2025-01-02")), Some("Out of Stock"));
        assert_eq!(ledger.to_grid(), stored);
    }

    #[test]
    fn empty_grid_yields_header_only_after_render() {
        let ledger = Ledger::from_grid(&[]);
        assert!(ledger.is_empty());
        assert_eq!(ledger.to_grid(), grid(&[&["Product"]]));
    }

    #[test]
    fn blank_date_columns_survive() {
        let stored = grid(&[
            &["Product", "2025-01-01"],
            &["Apple iPhone 13 (128GB)", ""],
        ]);
        let ledger =
            Ledger::from_grid(&stored).upsert(&obs("iPhone 13 (128GB)", "2025-01-05", "47999"));
        assert_eq!(ledger.to_grid()[0], vec!["Product", "2025-01-01", "2025-01-05"]);
    }

    fn observation_strategy() -> impl Strategy<Value = PriceObservation> {
        (
            prop::sample::select(vec!["iPhone 13 (128GB)", "iPhone 14 Pro (256GB)", "iPhone 15"]),
            0u32..60,
            prop_oneof![
                (1u32..200_000).prop_map(|p| PriceStatus::Price(p.to_string())),
                Just(PriceStatus::OutOfStock),
            ],
        )
            .prop_map(|(name, offset, status)| {
                PriceObservation::new(
                    name,
                    &status,
                    Store::Flipkart,
                    date("2025-01-01") + chrono::Days::new(u64::from(offset)),
                )
            })
    }

    proptest! {
        #[test]
        fn repeated_upsert_is_idempotent(
            history in prop::collection::vec(observation_strategy(), 0..12),
            next in observation_strategy(),
        ) {
            let base = history.iter().fold(Ledger::new(), |l, o| l.upsert(o));
            let once = base.clone().upsert(&next);
            let twice = once.clone().upsert(&next);
            prop_assert_eq!(once.to_grid(), twice.to_grid());
        }

        #[test]
        fn upsert_never_drops_rows_or_columns(
            history in prop::collection::vec(observation_strategy(), 0..12),
            next in observation_strategy(),
        ) {
            let before = history.iter().fold(Ledger::new(), |l, o| l.upsert(o));
            let reloaded = Ledger::from_grid(&before.to_grid());
            let after = reloaded.upsert(&next);

            for key in before.row_keys() {
                prop_assert!(after.row_keys().any(|k| k == key));
            }
            let after_dates: BTreeSet<_> = after.dates().collect();
            for d in before.dates() {
                prop_assert!(after_dates.contains(&d));
            }
            prop_assert!(after_dates.contains(&next.date));

            let before_keys: Vec<_> = before.row_keys().collect();
            let after_keys: Vec<_> = after.row_keys().take(before_keys.len()).collect();
            prop_assert_eq!(before_keys, after_keys);
        }
    }
}
