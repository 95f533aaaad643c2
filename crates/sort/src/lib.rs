//! `printpost-sort`: Print Post categorisation and export ordering.
//!
//! Pure engine crate: receives imported address lists that already carry
//! their address columns, returns sort categories and the manifest-ordered
//! export table. No file formats, no UI.

pub mod audit;
pub mod categorize;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod sequence;
pub mod summary;
pub mod table;
pub mod thresholds;

pub use categorize::Categorizer;
pub use config::SortConfig;
pub use engine::run;
pub use error::SortError;
pub use merge::{DuplicateColumns, ListMerger};
pub use model::{ArticleSize, Categories, CategoryEntry, PostcodeCount, SortResult};
pub use sequence::sequence;
pub use table::RecordTable;
pub use thresholds::{ThresholdSchedule, Thresholds};
