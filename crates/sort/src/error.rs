use std::fmt;

use printpost_plan::PlanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Merge called with no lists.
    EmptyInput,
    /// Article weight outside (0, 1000] grams.
    InvalidWeight(u32),
    /// Lodgement state is not one of the eight states.
    InvalidLodgementState(String),
    /// A column the operation depends on is not present or not resolved.
    MissingColumn { table: String, column: String },
    /// A duplicated column name makes header matching ambiguous.
    AmbiguousColumn { table: String, column: String },
    /// Row width differs from the header count.
    RaggedRow { table: String, row: usize, expected: usize, found: usize },
    /// Row order is not a permutation of the table's rows.
    InvalidRowOrder { table: String, rows: usize, order: usize },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold schedule, etc.).
    ConfigValidation(String),
    /// Sort plan lookup error.
    Plan(PlanError),
    /// IO error (config file read, etc.).
    Io(String),
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no mail lists to merge"),
            Self::InvalidWeight(grams) => {
                write!(f, "article weight {grams}g must be in the range (0, 1000]")
            }
            Self::InvalidLodgementState(value) => {
                write!(f, "lodgement state '{value}' is not an Australian state or territory")
            }
            Self::MissingColumn { table, column } => {
                write!(f, "list '{table}': missing column '{column}'")
            }
            Self::AmbiguousColumn { table, column } => {
                write!(f, "list '{table}': column '{column}' appears more than once")
            }
            Self::RaggedRow { table, row, expected, found } => {
                write!(f, "list '{table}', row {row}: expected {expected} values, found {found}")
            }
            Self::InvalidRowOrder { table, rows, order } => {
                write!(f, "list '{table}': row order of {order} entries is not a permutation of {rows} rows")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Plan(e) => write!(f, "sort plan error: {e}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Plan(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlanError> for SortError {
    fn from(e: PlanError) -> Self {
        Self::Plan(e)
    }
}
