//! VIP thresholds and tier derivation
//!
//! The tier is a pure function of cumulative completed deposits and the
//! threshold table: the number of thresholds the sum meets or exceeds.
//! Recomputation is idempotent and safe to re-run at any time.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::VipThresholdError;

/// A validated, strictly increasing list of cumulative-deposit thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct VipThresholds {
    thresholds: Vec<Decimal>,
}

impl VipThresholds {
    /// Validates and constructs a threshold table
    ///
    /// # Errors
    ///
    /// Rejects non-positive values and any non-strictly-increasing pair.
    pub fn new(thresholds: Vec<Decimal>) -> Result<Self, VipThresholdError> {
        for (index, value) in thresholds.iter().enumerate() {
            if *value <= Decimal::ZERO {
                return Err(VipThresholdError::NonPositiveThreshold {
                    index,
                    value: *value,
                });
            }
            if index > 0 && thresholds[index - 1] >= *value {
                return Err(VipThresholdError::NotStrictlyIncreasing { index });
            }
        }
        Ok(Self { thresholds })
    }

    /// The tier earned by a cumulative completed-deposit sum
    ///
    /// 0 below the first threshold; capped at the threshold count.
    pub fn tier_for(&self, cumulative_deposits: Money) -> u32 {
        self.thresholds
            .iter()
            .filter(|t| cumulative_deposits.amount() >= **t)
            .count() as u32
    }

    /// The highest tier this table can award
    pub fn max_tier(&self) -> u32 {
        self.thresholds.len() as u32
    }

    pub fn thresholds(&self) -> &[Decimal] {
        &self.thresholds
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

impl Default for VipThresholds {
    /// The built-in thresholds used when no configuration row exists
    fn default() -> Self {
        Self {
            thresholds: vec![dec!(50_000_000), dec!(150_000_000)],
        }
    }
}

impl TryFrom<Vec<Decimal>> for VipThresholds {
    type Error = VipThresholdError;

    fn try_from(thresholds: Vec<Decimal>) -> Result<Self, Self::Error> {
        VipThresholds::new(thresholds)
    }
}

impl From<VipThresholds> for Vec<Decimal> {
    fn from(value: VipThresholds) -> Self {
        value.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_scenarios() {
        let thresholds = VipThresholds::default();

        assert_eq!(thresholds.tier_for(Money::new(dec!(40_000_000))), 0);
        assert_eq!(thresholds.tier_for(Money::new(dec!(60_000_000))), 1);
        assert_eq!(thresholds.tier_for(Money::new(dec!(200_000_000))), 2);
    }

    #[test]
    fn test_tier_at_exact_threshold() {
        let thresholds = VipThresholds::default();
        assert_eq!(thresholds.tier_for(Money::new(dec!(50_000_000))), 1);
        assert_eq!(thresholds.tier_for(Money::new(dec!(150_000_000))), 2);
    }

    #[test]
    fn test_tier_capped_at_threshold_count() {
        let thresholds = VipThresholds::default();
        let huge = Money::new(dec!(999_999_999_999));
        assert_eq!(thresholds.tier_for(huge), thresholds.max_tier());
    }

    #[test]
    fn test_empty_table_always_tier_zero() {
        let thresholds = VipThresholds::new(vec![]).unwrap();
        assert_eq!(thresholds.tier_for(Money::new(dec!(1_000_000_000))), 0);
    }

    #[test]
    fn test_rejects_non_increasing() {
        let result = VipThresholds::new(vec![dec!(100), dec!(100)]);
        assert_eq!(
            result.unwrap_err(),
            VipThresholdError::NotStrictlyIncreasing { index: 1 }
        );

        let result = VipThresholds::new(vec![dec!(200), dec!(100)]);
        assert_eq!(
            result.unwrap_err(),
            VipThresholdError::NotStrictlyIncreasing { index: 1 }
        );
    }

    #[test]
    fn test_rejects_non_positive() {
        let result = VipThresholds::new(vec![dec!(0), dec!(100)]);
        assert!(matches!(
            result.unwrap_err(),
            VipThresholdError::NonPositiveThreshold { index: 0, .. }
        ));
    }

    #[test]
    fn test_deserialization_validates() {
        assert!(serde_json::from_str::<VipThresholds>("[100, 50]").is_err());
        let ok: VipThresholds = serde_json::from_str("[50000000, 150000000]").unwrap();
        assert_eq!(ok.max_tier(), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tier_is_idempotent_and_monotonic(
            a in 0i64..1_000_000_000i64,
            b in 0i64..1_000_000_000i64
        ) {
            let thresholds = VipThresholds::default();
            let ma = Money::new(Decimal::new(a, 0));
            let mb = Money::new(Decimal::new(b, 0));

            // Pure function: same input, same tier.
            prop_assert_eq!(thresholds.tier_for(ma), thresholds.tier_for(ma));

            // Monotone in the cumulative sum.
            if a <= b {
                prop_assert!(thresholds.tier_for(ma) <= thresholds.tier_for(mb));
            }
        }
    }
}
