use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Sort plan file could not be read.
    Io(String),
    /// First line is not a `dd/mm/yy` expiry date.
    InvalidExpiry(String),
    /// An indicator line appeared before any `STATE:` header.
    MissingState { line: usize },
    /// `STATE:` header names something other than the eight states.
    UnknownState { line: usize, value: String },
    /// Postcode token is not numeric.
    InvalidPostcode { line: usize, value: String },
    /// Postcode range runs from high to low.
    DescendingRange { line: usize, range: String },
    /// Indicator line without any postcodes.
    MissingIndicator { line: usize },
    /// A postcode points at an indicator with no state.
    DanglingIndicator { postcode: String, indicator: String },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::InvalidExpiry(value) => {
                write!(f, "sort plan expiry '{value}' is not a dd/mm/yy date")
            }
            Self::MissingState { line } => {
                write!(f, "line {line}: presort indicator listed before any STATE header")
            }
            Self::UnknownState { line, value } => {
                write!(f, "line {line}: unknown state '{value}'")
            }
            Self::InvalidPostcode { line, value } => {
                write!(f, "line {line}: invalid postcode '{value}'")
            }
            Self::DescendingRange { line, range } => {
                write!(f, "line {line}: postcode range '{range}' goes from high to low")
            }
            Self::MissingIndicator { line } => {
                write!(f, "line {line}: presort indicator has no postcodes")
            }
            Self::DanglingIndicator { postcode, indicator } => {
                write!(f, "postcode '{postcode}' maps to indicator '{indicator}' which has no state")
            }
        }
    }
}

impl std::error::Error for PlanError {}
