use std::collections::BTreeMap;

use printpost_plan::{Destination, LookupTable, StateCode};

use crate::error::SortError;
use crate::model::{ArticleSize, Categories, CategoryEntry, PostcodeCount};
use crate::table::RecordTable;
use crate::thresholds::{ThresholdSchedule, Thresholds};

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct IndicatorTally {
    count: usize,
    postcodes: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
struct DestinationTally {
    count: usize,
    indicators: BTreeMap<String, IndicatorTally>,
}

// ---------------------------------------------------------------------------
// Categorizer
// ---------------------------------------------------------------------------

/// Splits a list into residue, area direct and postcode direct per state.
pub struct Categorizer<'a> {
    lookup: &'a LookupTable,
    schedule: &'a ThresholdSchedule,
}

impl<'a> Categorizer<'a> {
    pub fn new(lookup: &'a LookupTable, schedule: &'a ThresholdSchedule) -> Self {
        Self { lookup, schedule }
    }

    /// Categorise every row of `table` by the state of its presort indicator.
    ///
    /// Rows whose `MS_SortCode` is blank or not on the plan count towards
    /// `Other`, which only ever holds residue.
    pub fn categorize(
        &self,
        table: &RecordTable,
        weight_grams: u32,
        size: ArticleSize,
        lodgement: StateCode,
    ) -> Result<Categories, SortError> {
        let thresholds = self.schedule.for_weight(weight_grams)?;
        let code_idx = table.sort_code_column()?;
        let postcode_idx = table.postcode_column()?;

        let tally = self.tally(table, code_idx, postcode_idx);
        let categories = match size {
            ArticleSize::Small => residue_only(&tally),
            ArticleSize::Large => group_totals(&tally, thresholds, lodgement),
        };

        log::debug!(
            "categorised {} {size} articles at {weight_grams}g (postcode {} / area {}), lodged in {lodgement}",
            categories.total(),
            thresholds.postcode_quantity,
            thresholds.area_quantity
        );
        Ok(categories)
    }

    fn tally(
        &self,
        table: &RecordTable,
        code_idx: usize,
        postcode_idx: usize,
    ) -> BTreeMap<Destination, DestinationTally> {
        let mut tally: BTreeMap<Destination, DestinationTally> = BTreeMap::new();

        for row in table.rows() {
            let indicator = &row[code_idx];
            match self.lookup.state_for(indicator) {
                Some(state) => {
                    let dest = tally.entry(Destination::State(state)).or_default();
                    dest.count += 1;
                    let group = dest.indicators.entry(indicator.clone()).or_default();
                    group.count += 1;
                    *group.postcodes.entry(row[postcode_idx].trim().to_string()).or_default() += 1;
                }
                None => tally.entry(Destination::Other).or_default().count += 1,
            }
        }

        tally
    }
}

/// Small articles: one residue entry per destination with articles.
fn residue_only(tally: &BTreeMap<Destination, DestinationTally>) -> Categories {
    let mut categories = Categories::default();
    for (dest, t) in tally {
        if t.count > 0 {
            categories.push(*dest, CategoryEntry::Residue { count: t.count });
        }
    }
    categories
}

/// Large articles: area direct everywhere, postcode direct only in the
/// lodgement state, everything else residue.
fn group_totals(
    tally: &BTreeMap<Destination, DestinationTally>,
    thresholds: Thresholds,
    lodgement: StateCode,
) -> Categories {
    let mut categories = Categories::default();

    for (dest, t) in tally {
        let mut allocated = 0usize;

        if *dest == Destination::State(lodgement) {
            for (indicator, group) in &t.indicators {
                let qualified: Vec<PostcodeCount> = group
                    .postcodes
                    .iter()
                    .filter(|(_, count)| **count >= thresholds.postcode_quantity)
                    .map(|(postcode, count)| PostcodeCount {
                        postcode: postcode.clone(),
                        count: *count,
                    })
                    .collect();
                let postcode_total: usize = qualified.iter().map(|p| p.count).sum();
                let remainder = group.count - postcode_total;

                if !qualified.is_empty() {
                    allocated += postcode_total;
                    categories.push(
                        *dest,
                        CategoryEntry::Postcode {
                            indicator: indicator.clone(),
                            postcodes: qualified,
                        },
                    );
                    // Leftovers of a postcode direct indicator are area direct
                    // whatever their size.
                    if remainder > 0 {
                        allocated += remainder;
                        categories.push(
                            *dest,
                            CategoryEntry::Area {
                                indicator: indicator.clone(),
                                count: remainder,
                            },
                        );
                    }
                } else if group.count >= thresholds.area_quantity {
                    allocated += group.count;
                    categories.push(
                        *dest,
                        CategoryEntry::Area {
                            indicator: indicator.clone(),
                            count: group.count,
                        },
                    );
                }
            }
        } else {
            for (indicator, group) in &t.indicators {
                if group.count >= thresholds.area_quantity {
                    allocated += group.count;
                    categories.push(
                        *dest,
                        CategoryEntry::Area {
                            indicator: indicator.clone(),
                            count: group.count,
                        },
                    );
                }
            }
        }

        let residue = t.count - allocated;
        if residue > 0 {
            categories.push(*dest, CategoryEntry::Residue { count: residue });
        }
    }

    categories
}
