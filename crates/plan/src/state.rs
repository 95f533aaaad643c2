use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// StateCode
// ---------------------------------------------------------------------------

/// One of the eight Australian states and territories on the sort plan.
///
/// Declaration order is the order buckets are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateCode {
    #[serde(rename = "ACT")]
    Act,
    #[serde(rename = "NSW")]
    Nsw,
    #[serde(rename = "VIC")]
    Vic,
    #[serde(rename = "QLD")]
    Qld,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "WA")]
    Wa,
    #[serde(rename = "TAS")]
    Tas,
    #[serde(rename = "NT")]
    Nt,
}

impl StateCode {
    pub const ALL: [StateCode; 8] = [
        Self::Act,
        Self::Nsw,
        Self::Vic,
        Self::Qld,
        Self::Sa,
        Self::Wa,
        Self::Tas,
        Self::Nt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Act => "ACT",
            Self::Nsw => "NSW",
            Self::Vic => "VIC",
            Self::Qld => "QLD",
            Self::Sa => "SA",
            Self::Wa => "WA",
            Self::Tas => "TAS",
            Self::Nt => "NT",
        }
    }

    /// Full name as typed into address lists.
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Act => "australian capital territory",
            Self::Nsw => "new south wales",
            Self::Vic => "victoria",
            Self::Qld => "queensland",
            Self::Sa => "south australia",
            Self::Wa => "western australia",
            Self::Tas => "tasmania",
            Self::Nt => "northern territory",
        }
    }

    /// True if `value` names this state, either abbreviated or in full.
    /// Case-insensitive, surrounding whitespace ignored.
    pub fn matches_name(&self, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        value == self.as_str().to_lowercase() || value == self.full_name()
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == upper)
            .ok_or_else(|| format!("'{s}' is not an Australian state or territory"))
    }
}

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Where an article is headed: a real state, or `Other` when its postcode
/// could not be placed on the sort plan (overseas, blank, unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Destination {
    State(StateCode),
    Other,
}

impl Destination {
    /// All destinations in reporting order, `Other` last.
    pub fn all() -> impl Iterator<Item = Destination> {
        StateCode::ALL
            .into_iter()
            .map(Destination::State)
            .chain(std::iter::once(Destination::Other))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State(state) => state.as_str(),
            Self::Other => "Other",
        }
    }

    pub fn state(&self) -> Option<StateCode> {
        match self {
            Self::State(state) => Some(*state),
            Self::Other => None,
        }
    }
}

impl From<StateCode> for Destination {
    fn from(state: StateCode) -> Self {
        Self::State(state)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Plain string so destinations can key JSON objects.
impl Serialize for Destination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
