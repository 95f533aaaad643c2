use printpost_plan::LookupTable;
use serde::Serialize;

use crate::error::SortError;

/// Derived column holding the presort indicator for each row.
pub const SORT_CODE_COLUMN: &str = "MS_SortCode";
/// Derived column holding the state implied by the presort indicator.
pub const SORT_STATE_COLUMN: &str = "MS_State";

const COUNTRY_NAMES: &[&str] = &["country"];
const STATE_NAMES: &[&str] = &["state"];
const POSTCODE_NAMES: &[&str] = &["postcode", "pcode"];

// ---------------------------------------------------------------------------
// Column roles
// ---------------------------------------------------------------------------

/// Columns resolved as the country, state and postcode of an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddressColumns {
    pub country: Option<usize>,
    pub state: Option<usize>,
    pub postcode: Option<usize>,
}

/// Columns the categorizer and sequencer read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortColumns {
    pub state: usize,
    pub postcode: usize,
    pub sort_code: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressRole {
    Country,
    State,
    Postcode,
}

fn address_role(header: &str) -> Option<AddressRole> {
    let normalized: String = header
        .chars()
        .filter(|c| *c != ' ')
        .collect::<String>()
        .to_lowercase();
    if COUNTRY_NAMES.contains(&normalized.as_str()) {
        Some(AddressRole::Country)
    } else if STATE_NAMES.contains(&normalized.as_str()) {
        Some(AddressRole::State)
    } else if POSTCODE_NAMES.contains(&normalized.as_str()) {
        Some(AddressRole::Postcode)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// RecordTable
// ---------------------------------------------------------------------------

/// One imported mail list: named columns and row-major string values.
///
/// Every row always has exactly one value per header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(skip)]
    address: AddressColumns,
}

impl RecordTable {
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, SortError> {
        let name = name.into();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(SortError::RaggedRow {
                table: name,
                row: i,
                expected: headers.len(),
                found: row.len(),
            });
        }

        Ok(Self {
            name,
            headers,
            rows,
            address: AddressColumns::default(),
        })
    }

    /// Build a table and resolve its address columns from the headers.
    pub fn with_identified_columns(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, SortError> {
        let mut table = Self::new(name, headers, rows)?;
        table.identify_address_columns();
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn address_columns(&self) -> AddressColumns {
        self.address
    }

    /// Set address roles explicitly. Indices past the last column are dropped.
    pub fn set_address_columns(&mut self, address: AddressColumns) {
        let width = self.headers.len();
        let keep = |idx: Option<usize>| idx.filter(|i| *i < width);
        self.address = AddressColumns {
            country: keep(address.country),
            state: keep(address.state),
            postcode: keep(address.postcode),
        };
    }

    /// Resolve country/state/postcode by header name, ignoring case and
    /// spaces. When several headers qualify the last one wins.
    pub fn identify_address_columns(&mut self) {
        let mut address = AddressColumns::default();
        for (i, header) in self.headers.iter().enumerate() {
            match address_role(header) {
                Some(AddressRole::Country) => address.country = Some(i),
                Some(AddressRole::State) => address.state = Some(i),
                Some(AddressRole::Postcode) => address.postcode = Some(i),
                None => {}
            }
        }
        self.address = address;
    }

    /// First column with exactly this header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    fn missing(&self, column: &str) -> SortError {
        SortError::MissingColumn {
            table: self.name.clone(),
            column: column.into(),
        }
    }

    pub fn sort_code_column(&self) -> Result<usize, SortError> {
        self.column_index(SORT_CODE_COLUMN)
            .ok_or_else(|| self.missing(SORT_CODE_COLUMN))
    }

    /// Resolved postcode column, falling back to a header named like one.
    pub fn postcode_column(&self) -> Result<usize, SortError> {
        self.address
            .postcode
            .or_else(|| {
                self.headers
                    .iter()
                    .rposition(|h| address_role(h) == Some(AddressRole::Postcode))
            })
            .ok_or_else(|| self.missing("Postcode"))
    }

    /// `MS_State` if sort codes were assigned, else the list's own state column.
    pub fn state_column(&self) -> Result<usize, SortError> {
        self.column_index(SORT_STATE_COLUMN)
            .or_else(|| self.address_state_column())
            .ok_or_else(|| self.missing("State"))
    }

    /// The state typed into the address: the resolved role, falling back to
    /// a header named like one. Merged lists only carry the first list's
    /// roles, so a later list's state column is found by name.
    pub fn address_state_column(&self) -> Option<usize> {
        self.address.state.or_else(|| {
            self.headers
                .iter()
                .rposition(|h| address_role(h) == Some(AddressRole::State))
        })
    }

    /// Resolve the postcode role by header name if it is unset. Other roles
    /// are left as they are.
    pub fn identify_postcode_column(&mut self) {
        if self.address.postcode.is_none() {
            self.address.postcode = self
                .headers
                .iter()
                .rposition(|h| address_role(h) == Some(AddressRole::Postcode));
        }
    }

    pub fn sort_columns(&self) -> Result<SortColumns, SortError> {
        Ok(SortColumns {
            state: self.state_column()?,
            postcode: self.postcode_column()?,
            sort_code: self.sort_code_column()?,
        })
    }

    /// Look every postcode up on the sort plan and record the presort
    /// indicator and its state in `MS_SortCode` / `MS_State`. Postcodes not
    /// on the plan get empty values. Re-running overwrites earlier codes.
    pub fn assign_sort_codes(&mut self, lookup: &LookupTable) -> Result<(), SortError> {
        let postcode_idx = self
            .address
            .postcode
            .ok_or_else(|| self.missing("Postcode"))?;

        let state_idx = match self.column_index(SORT_STATE_COLUMN) {
            Some(idx) => idx,
            None => self.push_column(SORT_STATE_COLUMN),
        };
        let code_idx = match self.column_index(SORT_CODE_COLUMN) {
            Some(idx) => idx,
            None => self.push_column(SORT_CODE_COLUMN),
        };

        let mut unresolved = 0usize;
        for row in &mut self.rows {
            let (code, state) = match lookup.locate(row[postcode_idx].trim()) {
                Some((indicator, state)) => (indicator.to_string(), state.as_str().to_string()),
                None => {
                    unresolved += 1;
                    (String::new(), String::new())
                }
            };
            row[state_idx] = state;
            row[code_idx] = code;
        }

        log::debug!(
            "list '{}': assigned sort codes to {} rows, {unresolved} unresolved",
            self.name,
            self.rows.len()
        );
        Ok(())
    }

    /// Append an empty column, returning its index.
    pub fn push_column(&mut self, header: impl Into<String>) -> usize {
        self.headers.push(header.into());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Move a column (header and values) to the end, keeping the order of
    /// the others and the address roles pointing at the same data.
    pub fn move_column_to_end(&mut self, idx: usize) {
        let last = self.headers.len().saturating_sub(1);
        if idx >= last {
            return;
        }

        let header = self.headers.remove(idx);
        self.headers.push(header);
        for row in &mut self.rows {
            let value = row.remove(idx);
            row.push(value);
        }

        let shift = |pos: Option<usize>| {
            pos.map(|p| match p {
                p if p == idx => last,
                p if p > idx => p - 1,
                p => p,
            })
        };
        self.address = AddressColumns {
            country: shift(self.address.country),
            state: shift(self.address.state),
            postcode: shift(self.address.postcode),
        };
    }

    /// Put rows into the given order. `order` must be a permutation of
    /// `0..row_count()`; anything else is rejected and leaves the rows alone.
    pub fn reorder(&mut self, order: &[usize]) -> Result<(), SortError> {
        let invalid = || SortError::InvalidRowOrder {
            table: self.name.clone(),
            rows: self.rows.len(),
            order: order.len(),
        };
        if order.len() != self.rows.len() {
            return Err(invalid());
        }
        let mut seen = vec![false; order.len()];
        for &i in order {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(invalid()),
            }
        }

        let mut slots: Vec<Option<Vec<String>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order.iter().filter_map(|&i| slots[i].take()).collect();
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>, Vec<Vec<String>>, AddressColumns) {
        (self.name, self.headers, self.rows, self.address)
    }

    pub(crate) fn from_parts(
        name: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        address: AddressColumns,
    ) -> Self {
        Self {
            name,
            headers,
            rows,
            address,
        }
    }
}
