//! `printpost-plan`: the Print Post sort plan lookup service.
//!
//! Maps postcodes to presort indicators and presort indicators to states.
//! Loaded once per run and shared read-only by the sorting engine.

pub mod error;
pub mod lookup;
pub mod parse;
pub mod state;

pub use error::PlanError;
pub use lookup::LookupTable;
pub use parse::{load_sort_plan, parse_sort_plan};
pub use state::{Destination, StateCode};
