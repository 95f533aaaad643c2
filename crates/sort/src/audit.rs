use printpost_plan::{Destination, LookupTable};

use crate::error::SortError;
use crate::model::StateMismatch;
use crate::table::RecordTable;

/// Rows whose typed state is not the state their postcode belongs to.
///
/// Compares the list's own state column against the state of the row's
/// presort indicator, accepting abbreviations and full names. Lists without
/// a state column have nothing to check. Rows off the plan or with a blank
/// state are skipped.
pub fn find_state_mismatches(
    table: &RecordTable,
    lookup: &LookupTable,
) -> Result<Vec<StateMismatch>, SortError> {
    let Some(state_idx) = table.address_state_column() else {
        return Ok(Vec::new());
    };
    let code_idx = table.sort_code_column()?;

    let mismatches: Vec<StateMismatch> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let expected = lookup.state_for(&row[code_idx])?;
            let recorded = &row[state_idx];
            let blank = recorded.trim().is_empty();
            (!blank && !expected.matches_name(recorded)).then(|| StateMismatch {
                row: i,
                recorded: recorded.clone(),
                expected: Destination::State(expected),
            })
        })
        .collect();

    if !mismatches.is_empty() {
        log::warn!(
            "list '{}': {} rows have a state that does not match their postcode",
            table.name(),
            mismatches.len()
        );
    }
    Ok(mismatches)
}
