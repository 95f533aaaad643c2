//! Manifest ordering of the export list.
//!
//! Each row gets a precomputed [`ManifestKey`] and the rows are stably sorted
//! by it, so the order is a true total order and re-sequencing is a no-op.
//! Resulting order:
//!
//! 1. rows with a presort indicator before rows without one;
//! 2. by state, ascending;
//! 3. within a state, area/postcode direct indicators before residue ones;
//! 4. by indicator, ascending;
//! 5. within an indicator, postcode direct rows first;
//! 6. by postcode, ascending.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::SortError;
use crate::model::{Categories, CategoryEntry};
use crate::table::{RecordTable, SortColumns};

// ---------------------------------------------------------------------------
// DirectIndex
// ---------------------------------------------------------------------------

/// Indicators that made area or postcode direct, with the postcodes of each
/// that made postcode direct.
#[derive(Debug, Clone, Default)]
pub struct DirectIndex {
    indicators: HashMap<String, HashSet<String>>,
}

impl DirectIndex {
    pub fn from_categories(categories: &Categories) -> Self {
        let mut indicators: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in categories.entries() {
            match entry {
                CategoryEntry::Residue { .. } => {}
                CategoryEntry::Area { indicator, .. } => {
                    indicators.entry(indicator.clone()).or_default();
                }
                CategoryEntry::Postcode { indicator, postcodes } => {
                    indicators
                        .entry(indicator.clone())
                        .or_default()
                        .extend(postcodes.iter().map(|p| p.postcode.clone()));
                }
            }
        }
        Self { indicators }
    }

    pub fn is_direct(&self, indicator: &str) -> bool {
        self.indicators.contains_key(indicator)
    }

    pub fn is_postcode_direct(&self, indicator: &str, postcode: &str) -> bool {
        self.indicators
            .get(indicator)
            .is_some_and(|postcodes| postcodes.contains(postcode))
    }
}

// ---------------------------------------------------------------------------
// ManifestKey
// ---------------------------------------------------------------------------

/// Sort key of one row. Field order is comparison priority; `false` sorts
/// before `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManifestKey<'a> {
    unresolved: bool,
    state: &'a str,
    residue: bool,
    indicator: &'a str,
    not_postcode_direct: bool,
    postcode: &'a str,
}

impl<'a> ManifestKey<'a> {
    pub fn for_row(row: &'a [String], columns: SortColumns, index: &DirectIndex) -> Self {
        let indicator = row[columns.sort_code].as_str();
        if indicator.is_empty() {
            // Unresolved rows all tie and keep their relative order.
            return Self {
                unresolved: true,
                state: "",
                residue: false,
                indicator: "",
                not_postcode_direct: false,
                postcode: "",
            };
        }

        let postcode = row[columns.postcode].trim();
        Self {
            unresolved: false,
            state: row[columns.state].as_str(),
            residue: !index.is_direct(indicator),
            indicator,
            not_postcode_direct: !index.is_postcode_direct(indicator, postcode),
            postcode,
        }
    }
}

/// Compare two rows in manifest order.
pub fn manifest_cmp(a: &[String], b: &[String], columns: SortColumns, index: &DirectIndex) -> Ordering {
    ManifestKey::for_row(a, columns, index).cmp(&ManifestKey::for_row(b, columns, index))
}

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

/// Row indices of `table` in manifest order.
pub fn sequence_order(table: &RecordTable, categories: &Categories) -> Result<Vec<usize>, SortError> {
    let columns = table.sort_columns()?;
    let index = DirectIndex::from_categories(categories);

    let keys: Vec<ManifestKey<'_>> = table
        .rows()
        .iter()
        .map(|row| ManifestKey::for_row(row, columns, &index))
        .collect();

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&x, &y| keys[x].cmp(&keys[y]));
    Ok(order)
}

/// Reorder `table` into manifest order.
pub fn sequence(mut table: RecordTable, categories: &Categories) -> Result<RecordTable, SortError> {
    let order = sequence_order(&table, categories)?;
    table.reorder(&order)?;
    log::debug!("sequenced {} rows of '{}'", table.row_count(), table.name());
    Ok(table)
}
