use chrono::NaiveDate;
use printpost_plan::LookupTable;

use crate::audit::find_state_mismatches;
use crate::categorize::Categorizer;
use crate::config::SortConfig;
use crate::error::SortError;
use crate::merge::{presort, ListMerger};
use crate::model::{SortMeta, SortResult};
use crate::sequence::sequence;
use crate::summary::compute_summary;
use crate::table::{RecordTable, SORT_CODE_COLUMN};

/// Run a sort job per config. Returns categories + the manifest-ordered list.
pub fn run(
    config: &SortConfig,
    lookup: &LookupTable,
    tables: Vec<RecordTable>,
) -> Result<SortResult, SortError> {
    run_on(config, lookup, tables, chrono::Local::now().date_naive())
}

/// [`run`] with an explicit date for the sort plan expiry check.
pub fn run_on(
    config: &SortConfig,
    lookup: &LookupTable,
    tables: Vec<RecordTable>,
    today: NaiveDate,
) -> Result<SortResult, SortError> {
    config.validate()?;
    let lodgement = config.lodgement()?;
    let schedule = config.schedule()?;

    let plan_expired = lookup.is_expired(today);
    if plan_expired {
        log::warn!(
            "sort plan expired on {}; categories may not match current Print Post rules",
            lookup.expiry().map(|d| d.to_string()).unwrap_or_default()
        );
    }

    let tables = tables
        .into_iter()
        .map(|table| with_sort_codes(table, lookup))
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = ListMerger::new(config.merge.duplicate_columns).merge(tables)?;
    presort(&mut merged)?;

    let categories = Categorizer::new(lookup, &schedule).categorize(
        &merged,
        config.weight_grams,
        config.size,
        lodgement,
    )?;

    let table = sequence(merged, &categories)?;
    let state_mismatches = find_state_mismatches(&table, lookup)?;
    let summary = compute_summary(&categories);

    log::info!(
        "sort '{}': {} articles, {} postcode direct, {} area direct, {} residue",
        config.name,
        summary.total_records,
        summary.postcode_direct,
        summary.area_direct,
        summary.residue
    );

    Ok(SortResult {
        meta: SortMeta {
            job_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            weight_grams: config.weight_grams,
            size: config.size,
            lodgement_state: lodgement.as_str().to_string(),
            plan_expiry: lookup.expiry(),
            plan_expired,
        },
        summary,
        categories,
        state_mismatches,
        table,
    })
}

/// Lists arrive from the importers without sort codes; derive them here.
fn with_sort_codes(mut table: RecordTable, lookup: &LookupTable) -> Result<RecordTable, SortError> {
    if table.column_index(SORT_CODE_COLUMN).is_some() {
        return Ok(table);
    }
    table.identify_postcode_column();
    table.assign_sort_codes(lookup)?;
    Ok(table)
}
