use serde::Deserialize;

use crate::error::SortError;

/// Heaviest article the Print Post service accepts.
pub const MAX_WEIGHT_GRAMS: u32 = 1000;

/// Minimum article counts for a direct rate at a given weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Articles one postcode needs to be postcode direct.
    pub postcode_quantity: usize,
    /// Articles one presort indicator needs to be area direct.
    pub area_quantity: usize,
}

/// One weight tier, covering weights up to and including `max_weight_grams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThresholdTier {
    pub max_weight_grams: u32,
    pub postcode_quantity: usize,
    pub area_quantity: usize,
}

/// Weight tiers, ascending by upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSchedule {
    tiers: Vec<ThresholdTier>,
}

impl Default for ThresholdSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                ThresholdTier { max_weight_grams: 250, postcode_quantity: 30, area_quantity: 50 },
                ThresholdTier { max_weight_grams: 500, postcode_quantity: 15, area_quantity: 25 },
                ThresholdTier { max_weight_grams: 1000, postcode_quantity: 10, area_quantity: 15 },
            ],
        }
    }
}

impl ThresholdSchedule {
    pub fn new(tiers: Vec<ThresholdTier>) -> Result<Self, SortError> {
        let schedule = Self { tiers };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn tiers(&self) -> &[ThresholdTier] {
        &self.tiers
    }

    pub fn validate(&self) -> Result<(), SortError> {
        let last = self.tiers.last().ok_or_else(|| {
            SortError::ConfigValidation("threshold schedule needs at least one tier".into())
        })?;

        for pair in self.tiers.windows(2) {
            if pair[1].max_weight_grams <= pair[0].max_weight_grams {
                return Err(SortError::ConfigValidation(format!(
                    "threshold tiers must ascend: {}g listed after {}g",
                    pair[1].max_weight_grams, pair[0].max_weight_grams
                )));
            }
        }

        if last.max_weight_grams < MAX_WEIGHT_GRAMS {
            return Err(SortError::ConfigValidation(format!(
                "threshold tiers stop at {}g, must cover {MAX_WEIGHT_GRAMS}g",
                last.max_weight_grams
            )));
        }

        if let Some(tier) = self
            .tiers
            .iter()
            .find(|t| t.postcode_quantity == 0 || t.area_quantity == 0)
        {
            return Err(SortError::ConfigValidation(format!(
                "tier up to {}g: quantities must be positive",
                tier.max_weight_grams
            )));
        }

        Ok(())
    }

    /// Thresholds for an article weight. Weight must be in (0, 1000].
    pub fn for_weight(&self, weight_grams: u32) -> Result<Thresholds, SortError> {
        validate_weight(weight_grams)?;
        self.tiers
            .iter()
            .find(|t| weight_grams <= t.max_weight_grams)
            .map(|t| Thresholds {
                postcode_quantity: t.postcode_quantity,
                area_quantity: t.area_quantity,
            })
            .ok_or(SortError::InvalidWeight(weight_grams))
    }
}

pub fn validate_weight(weight_grams: u32) -> Result<(), SortError> {
    if weight_grams == 0 || weight_grams > MAX_WEIGHT_GRAMS {
        return Err(SortError::InvalidWeight(weight_grams));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(weight: u32) -> (usize, usize) {
        let t = ThresholdSchedule::default().for_weight(weight).unwrap();
        (t.postcode_quantity, t.area_quantity)
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(quantities(1), (30, 50));
        assert_eq!(quantities(125), (30, 50));
        assert_eq!(quantities(250), (30, 50));
        assert_eq!(quantities(251), (15, 25));
        assert_eq!(quantities(500), (15, 25));
        assert_eq!(quantities(501), (10, 15));
        assert_eq!(quantities(1000), (10, 15));
    }

    #[test]
    fn out_of_range_weights() {
        let schedule = ThresholdSchedule::default();
        assert_eq!(schedule.for_weight(0), Err(SortError::InvalidWeight(0)));
        assert_eq!(schedule.for_weight(1001), Err(SortError::InvalidWeight(1001)));
    }

    #[test]
    fn rejects_bad_schedules() {
        let tier = |max, pc, area| ThresholdTier {
            max_weight_grams: max,
            postcode_quantity: pc,
            area_quantity: area,
        };
        assert!(ThresholdSchedule::new(vec![]).is_err());
        assert!(ThresholdSchedule::new(vec![tier(500, 15, 25)]).is_err());
        assert!(ThresholdSchedule::new(vec![tier(500, 15, 25), tier(500, 10, 15)]).is_err());
        assert!(ThresholdSchedule::new(vec![tier(1000, 0, 15)]).is_err());
        assert!(ThresholdSchedule::new(vec![tier(1000, 10, 15)]).is_ok());
    }
}
