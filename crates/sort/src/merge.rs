use serde::Deserialize;

use crate::error::SortError;
use crate::table::{RecordTable, SORT_CODE_COLUMN};

/// Name given to the list produced by merging several imports.
pub const MERGED_LIST_NAME: &str = "Exported List";

/// What to do when a header appears more than once (ignoring case) in a list
/// and so could match more than one column of the other list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateColumns {
    /// Fail with `AmbiguousColumn`.
    #[default]
    Reject,
    /// Pair each column with the first unclaimed column of the same name.
    FirstMatch,
}

/// Combines imported lists with differing schemas into one list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMerger {
    duplicates: DuplicateColumns,
}

impl ListMerger {
    pub fn new(duplicates: DuplicateColumns) -> Self {
        Self { duplicates }
    }

    /// Merge lists left to right.
    ///
    /// Columns are matched by case-insensitive header name. The result has
    /// the first list's columns followed by each later list's unmatched
    /// columns; rows are padded with empty values where a list has no such
    /// column. A single list comes back untouched. Otherwise `MS_SortCode`
    /// ends up as the last column.
    pub fn merge(&self, tables: Vec<RecordTable>) -> Result<RecordTable, SortError> {
        let mut tables = tables.into_iter();
        let first = tables.next().ok_or(SortError::EmptyInput)?;

        let mut merged = first;
        let mut folded = 1usize;
        for next in tables {
            merged = self.merge_two(merged, next)?;
            folded += 1;
        }

        if folded == 1 {
            return Ok(merged);
        }

        merged.set_name(MERGED_LIST_NAME);
        if let Some(idx) = merged.column_index(SORT_CODE_COLUMN) {
            merged.move_column_to_end(idx);
        }

        log::debug!(
            "merged {folded} lists: {} columns, {} rows",
            merged.column_count(),
            merged.row_count()
        );
        Ok(merged)
    }

    fn merge_two(&self, a: RecordTable, b: RecordTable) -> Result<RecordTable, SortError> {
        let b_to_a = self.match_columns(&a, &b)?;

        let (name, mut headers, mut rows, address) = a.into_parts();
        let (_, b_headers, b_rows, _) = b.into_parts();

        // Where each of b's columns lands in the merged table.
        let mut target = Vec::with_capacity(b_headers.len());
        for (j, header) in b_headers.into_iter().enumerate() {
            match b_to_a[j] {
                Some(i) => target.push(i),
                None => {
                    target.push(headers.len());
                    headers.push(header);
                }
            }
        }

        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        for b_row in b_rows {
            let mut row = vec![String::new(); width];
            for (j, value) in b_row.into_iter().enumerate() {
                row[target[j]] = value;
            }
            rows.push(row);
        }

        Ok(RecordTable::from_parts(name, headers, rows, address))
    }

    /// For each column of `b`, the column of `a` it merges into.
    fn match_columns(&self, a: &RecordTable, b: &RecordTable) -> Result<Vec<Option<usize>>, SortError> {
        let a_names: Vec<String> = a.headers().iter().map(|h| h.to_lowercase()).collect();
        let b_names: Vec<String> = b.headers().iter().map(|h| h.to_lowercase()).collect();
        let mut b_to_a: Vec<Option<usize>> = vec![None; b_names.len()];

        for (i, name) in a_names.iter().enumerate() {
            let candidates: Vec<usize> = b_names
                .iter()
                .enumerate()
                .filter(|(j, b_name)| *b_name == name && b_to_a[*j].is_none())
                .map(|(j, _)| j)
                .collect();

            let Some(&j) = candidates.first() else {
                continue;
            };

            if self.duplicates == DuplicateColumns::Reject {
                if candidates.len() > 1 {
                    return Err(SortError::AmbiguousColumn {
                        table: b.name().to_string(),
                        column: b.headers()[j].clone(),
                    });
                }
                if a_names.iter().filter(|n| *n == name).count() > 1 {
                    return Err(SortError::AmbiguousColumn {
                        table: a.name().to_string(),
                        column: a.headers()[i].clone(),
                    });
                }
            }

            b_to_a[j] = Some(i);
        }

        Ok(b_to_a)
    }
}

/// Stable pre-ordering by presort indicator then postcode, both ascending.
pub fn presort(table: &mut RecordTable) -> Result<(), SortError> {
    let code_idx = table.sort_code_column()?;
    let postcode_idx = table.postcode_column()?;

    let rows = table.rows();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&x, &y| {
        (rows[x][code_idx].as_str(), rows[x][postcode_idx].trim())
            .cmp(&(rows[y][code_idx].as_str(), rows[y][postcode_idx].trim()))
    });
    table.reorder(&order)?;
    Ok(())
}
