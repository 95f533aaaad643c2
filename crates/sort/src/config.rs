use std::path::Path;

use printpost_plan::StateCode;
use serde::Deserialize;

use crate::error::SortError;
use crate::merge::DuplicateColumns;
use crate::model::ArticleSize;
use crate::thresholds::{validate_weight, ThresholdSchedule, ThresholdTier};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One sort job: what is being posted and where it is lodged.
#[derive(Debug, Clone, Deserialize)]
pub struct SortConfig {
    pub name: String,
    /// Weight of a single article in grams.
    pub weight_grams: u32,
    pub size: ArticleSize,
    pub lodgement_state: String,
    #[serde(default)]
    pub merge: MergeConfig,
    /// Overrides the standard weight tiers when present.
    #[serde(default)]
    pub thresholds: Option<Vec<ThresholdTier>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub duplicate_columns: DuplicateColumns,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SortConfig {
    pub fn new(name: impl Into<String>, weight_grams: u32, size: ArticleSize, lodgement: StateCode) -> Self {
        Self {
            name: name.into(),
            weight_grams,
            size,
            lodgement_state: lodgement.as_str().to_string(),
            merge: MergeConfig::default(),
            thresholds: None,
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, SortError> {
        let config: SortConfig =
            toml::from_str(input).map_err(|e| SortError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SortError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| SortError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), SortError> {
        validate_weight(self.weight_grams)?;
        self.lodgement()?;
        self.schedule()?;
        Ok(())
    }

    /// Lodgement state as a state code. `Other` is not a place to lodge.
    pub fn lodgement(&self) -> Result<StateCode, SortError> {
        self.lodgement_state
            .parse::<StateCode>()
            .map_err(|_| SortError::InvalidLodgementState(self.lodgement_state.clone()))
    }

    pub fn schedule(&self) -> Result<ThresholdSchedule, SortError> {
        match &self.thresholds {
            Some(tiers) => ThresholdSchedule::new(tiers.clone()),
            None => Ok(ThresholdSchedule::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
