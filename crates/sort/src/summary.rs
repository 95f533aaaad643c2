use std::collections::BTreeMap;

use crate::model::{Categories, CategoryEntry, SortSummary};

/// Totals per sort category and per destination.
pub fn compute_summary(categories: &Categories) -> SortSummary {
    let mut postcode_direct = 0;
    let mut area_direct = 0;
    let mut residue = 0;
    let mut per_destination = BTreeMap::new();

    for (destination, entries) in categories.iter() {
        for entry in entries {
            match entry {
                CategoryEntry::Postcode { .. } => postcode_direct += entry.count(),
                CategoryEntry::Area { count, .. } => area_direct += count,
                CategoryEntry::Residue { count } => residue += count,
            }
        }
        per_destination.insert(destination, categories.total_for(destination));
    }

    SortSummary {
        total_records: postcode_direct + area_direct + residue,
        postcode_direct,
        area_direct,
        residue,
        per_destination,
    }
}
