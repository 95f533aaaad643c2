use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::PlanError;
use crate::state::{Destination, StateCode};

/// Postcode → presort indicator → state lookup.
///
/// Immutable once built; share it by reference across sort runs.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    postcode_to_indicator: HashMap<String, String>,
    indicator_to_state: HashMap<String, StateCode>,
    expiry: Option<NaiveDate>,
}

impl LookupTable {
    /// Build a table, checking every postcode's indicator has a state.
    pub fn new(
        postcode_to_indicator: HashMap<String, String>,
        indicator_to_state: HashMap<String, StateCode>,
        expiry: Option<NaiveDate>,
    ) -> Result<Self, PlanError> {
        if let Some((postcode, indicator)) = postcode_to_indicator
            .iter()
            .find(|(_, indicator)| !indicator_to_state.contains_key(*indicator))
        {
            return Err(PlanError::DanglingIndicator {
                postcode: postcode.clone(),
                indicator: indicator.clone(),
            });
        }

        Ok(Self {
            postcode_to_indicator,
            indicator_to_state,
            expiry,
        })
    }

    pub fn indicator_for(&self, postcode: &str) -> Option<&str> {
        self.postcode_to_indicator.get(postcode).map(String::as_str)
    }

    pub fn state_for(&self, indicator: &str) -> Option<StateCode> {
        self.indicator_to_state.get(indicator).copied()
    }

    /// Destination for a presort indicator; blank or unknown → `Other`.
    pub fn destination_for(&self, indicator: &str) -> Destination {
        self.state_for(indicator)
            .map(Destination::State)
            .unwrap_or(Destination::Other)
    }

    /// Indicator and state for a postcode in one step.
    pub fn locate(&self, postcode: &str) -> Option<(&str, StateCode)> {
        let indicator = self.indicator_for(postcode)?;
        let state = self.state_for(indicator)?;
        Some((indicator, state))
    }

    pub fn postcodes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.postcode_to_indicator
            .iter()
            .map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.postcode_to_indicator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postcode_to_indicator.is_empty()
    }

    pub fn indicator_count(&self) -> usize {
        self.indicator_to_state.len()
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry
    }

    /// The plan stops applying the day after its expiry date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry.is_some_and(|expiry| today > expiry)
    }
}
