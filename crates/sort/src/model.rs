use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use printpost_plan::Destination;
use serde::{Deserialize, Serialize};

use crate::error::SortError;
use crate::table::RecordTable;

// ---------------------------------------------------------------------------
// Article size
// ---------------------------------------------------------------------------

/// Small articles only ever go to residue; large articles can qualify for
/// area or postcode direct rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSize {
    Small,
    Large,
}

impl fmt::Display for ArticleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Large => write!(f, "large"),
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostcodeCount {
    pub postcode: String,
    pub count: usize,
}

/// One line of a destination's sort plan breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CategoryEntry {
    Residue {
        count: usize,
    },
    Area {
        indicator: String,
        count: usize,
    },
    Postcode {
        indicator: String,
        postcodes: Vec<PostcodeCount>,
    },
}

impl CategoryEntry {
    pub fn count(&self) -> usize {
        match self {
            Self::Residue { count } | Self::Area { count, .. } => *count,
            Self::Postcode { postcodes, .. } => postcodes.iter().map(|p| p.count).sum(),
        }
    }

    pub fn indicator(&self) -> Option<&str> {
        match self {
            Self::Residue { .. } => None,
            Self::Area { indicator, .. } | Self::Postcode { indicator, .. } => Some(indicator.as_str()),
        }
    }
}

/// Category buckets for every destination, `Other` included.
///
/// A destination with no articles has an empty bucket. Within a bucket a
/// `Postcode` entry comes directly before the `Area` entry of the same
/// indicator; `Residue` is always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Categories {
    buckets: BTreeMap<Destination, Vec<CategoryEntry>>,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            buckets: Destination::all().map(|d| (d, Vec::new())).collect(),
        }
    }
}

impl Categories {
    pub fn bucket(&self, destination: Destination) -> &[CategoryEntry] {
        self.buckets
            .get(&destination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn push(&mut self, destination: Destination, entry: CategoryEntry) {
        self.buckets.entry(destination).or_default().push(entry);
    }

    /// Articles allocated to a destination across all its entries.
    pub fn total_for(&self, destination: Destination) -> usize {
        self.bucket(destination).iter().map(CategoryEntry::count).sum()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().flatten().map(CategoryEntry::count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Destination, &[CategoryEntry])> {
        self.buckets.iter().map(|(d, entries)| (*d, entries.as_slice()))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.buckets.values().flatten()
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// A row whose typed state disagrees with the state of its postcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMismatch {
    pub row: usize,
    pub recorded: String,
    pub expected: Destination,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSummary {
    pub total_records: usize,
    pub postcode_direct: usize,
    pub area_direct: usize,
    pub residue: usize,
    pub per_destination: BTreeMap<Destination, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortMeta {
    pub job_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub weight_grams: u32,
    pub size: ArticleSize,
    pub lodgement_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_expiry: Option<NaiveDate>,
    pub plan_expired: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortResult {
    pub meta: SortMeta,
    pub summary: SortSummary,
    pub categories: Categories,
    pub state_mismatches: Vec<StateMismatch>,
    /// Merged list in manifest order.
    pub table: RecordTable,
}

impl SortResult {
    /// Pretty JSON for the manifest and label plan renderers.
    pub fn to_json(&self) -> Result<String, SortError> {
        serde_json::to_string_pretty(self).map_err(|e| SortError::Io(e.to_string()))
    }
}
