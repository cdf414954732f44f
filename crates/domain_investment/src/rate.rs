//! Rate tiers and the term-to-rate resolver
//!
//! A rate table maps an investment's term length to a daily profit rate.
//! The table is validated when it is written (ordering, overlaps, gaps);
//! resolution against an already-accepted table is pure and total.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Rate;

use crate::error::RateTableError;

/// Fallback daily rate (percent) when no tier table is configured
pub const DEFAULT_DAILY_RATE_PERCENT: Decimal = dec!(1.0);

/// A single rate tier: a day range and the daily rate it pays
///
/// `max_days` of `None` marks an open-ended tier covering every term at or
/// above `min_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_days: u32,
    #[serde(default)]
    pub max_days: Option<u32>,
    pub rate: Rate,
}

impl RateTier {
    pub fn bounded(min_days: u32, max_days: u32, rate: Rate) -> Self {
        Self {
            min_days,
            max_days: Some(max_days),
            rate,
        }
    }

    pub fn open_ended(min_days: u32, rate: Rate) -> Self {
        Self {
            min_days,
            max_days: None,
            rate,
        }
    }

    fn contains(&self, days: u32) -> bool {
        days >= self.min_days && self.max_days.map_or(true, |max| days <= max)
    }
}

/// A validated, ordered, non-overlapping rate tier table
///
/// Construction sorts the tiers by `min_days` and enforces the write-time
/// invariants:
/// - every `min_days` is at least 1 and bounds are not inverted
/// - rates are non-negative
/// - tiers do not overlap
/// - two bounded tiers leave no uncovered finite gap between them
/// - only the last tier may be open-ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateTier>", into = "Vec<RateTier>")]
pub struct RateTable {
    tiers: Vec<RateTier>,
}

impl RateTable {
    /// Validates and constructs a rate table
    ///
    /// An empty tier list is accepted; resolution then falls back to the
    /// engine default rate.
    ///
    /// # Errors
    ///
    /// Returns a `RateTableError` describing the first violated invariant.
    pub fn new(mut tiers: Vec<RateTier>) -> Result<Self, RateTableError> {
        for tier in &tiers {
            if tier.min_days < 1 {
                return Err(RateTableError::MinDaysBelowOne(tier.min_days));
            }
            if let Some(max) = tier.max_days {
                if max < tier.min_days {
                    return Err(RateTableError::InvertedBounds {
                        min_days: tier.min_days,
                        max_days: max,
                    });
                }
            }
            if tier.rate.as_percentage().is_sign_negative() {
                return Err(RateTableError::NegativeRate {
                    min_days: tier.min_days,
                    rate: tier.rate.as_percentage(),
                });
            }
        }

        tiers.sort_by_key(|t| t.min_days);

        for pair in tiers.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            match a.max_days {
                None => {
                    // An open tier swallows every later tier.
                    return Err(RateTableError::OpenEndedNotLast {
                        min_days: a.min_days,
                    });
                }
                Some(a_max) if b.min_days <= a_max => {
                    return Err(RateTableError::Overlap { day: b.min_days });
                }
                Some(a_max) if b.min_days > a_max + 1 => {
                    return Err(RateTableError::Gap {
                        gap_start: a_max + 1,
                        gap_end: b.min_days - 1,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self { tiers })
    }

    /// Resolves the daily rate for a term length
    ///
    /// Pure and total: returns the first tier containing `days`; if none
    /// matches, the tier with the largest `min_days` (open-ended fallback);
    /// if the table is empty, the engine default rate. Never fails.
    pub fn resolve(&self, days: u32) -> Rate {
        if let Some(tier) = self.tiers.iter().find(|t| t.contains(days)) {
            return tier.rate;
        }

        // Tiers are sorted by min_days, so the fallback is the last one.
        match self.tiers.last() {
            Some(tier) => tier.rate,
            None => Rate::from_percentage(DEFAULT_DAILY_RATE_PERCENT),
        }
    }

    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Default for RateTable {
    /// The built-in product table used when no configuration row exists
    fn default() -> Self {
        Self {
            tiers: vec![
                RateTier::bounded(1, 6, Rate::from_percentage(dec!(1.0))),
                RateTier::bounded(7, 14, Rate::from_percentage(dec!(2.0))),
                RateTier::bounded(15, 29, Rate::from_percentage(dec!(3.0))),
                RateTier::open_ended(30, Rate::from_percentage(dec!(5.0))),
            ],
        }
    }
}

impl TryFrom<Vec<RateTier>> for RateTable {
    type Error = RateTableError;

    fn try_from(tiers: Vec<RateTier>) -> Result<Self, Self::Error> {
        RateTable::new(tiers)
    }
}

impl From<RateTable> for Vec<RateTier> {
    fn from(table: RateTable) -> Self {
        table.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_table() -> RateTable {
        RateTable::default()
    }

    #[test]
    fn test_resolve_matches_tier() {
        let table = product_table();
        assert_eq!(table.resolve(10), Rate::from_percentage(dec!(2.0)));
        assert_eq!(table.resolve(30), Rate::from_percentage(dec!(5.0)));
        assert_eq!(table.resolve(1000), Rate::from_percentage(dec!(5.0)));
    }

    #[test]
    fn test_resolve_boundaries() {
        let table = product_table();
        assert_eq!(table.resolve(1), Rate::from_percentage(dec!(1.0)));
        assert_eq!(table.resolve(6), Rate::from_percentage(dec!(1.0)));
        assert_eq!(table.resolve(7), Rate::from_percentage(dec!(2.0)));
        assert_eq!(table.resolve(29), Rate::from_percentage(dec!(3.0)));
    }

    #[test]
    fn test_resolve_open_ended_fallback() {
        // All tiers bounded: days past the last bound fall back to the
        // tier with the largest min_days.
        let table = RateTable::new(vec![
            RateTier::bounded(1, 9, Rate::from_percentage(dec!(1.0))),
            RateTier::bounded(10, 20, Rate::from_percentage(dec!(2.5))),
        ])
        .unwrap();

        assert_eq!(table.resolve(500), Rate::from_percentage(dec!(2.5)));
    }

    #[test]
    fn test_resolve_empty_table_uses_default() {
        let table = RateTable::new(vec![]).unwrap();
        assert_eq!(table.resolve(7), Rate::from_percentage(dec!(1.0)));
    }

    #[test]
    fn test_rejects_overlap() {
        let result = RateTable::new(vec![
            RateTier::bounded(1, 10, Rate::from_percentage(dec!(1.0))),
            RateTier::bounded(10, 20, Rate::from_percentage(dec!(2.0))),
        ]);
        assert_eq!(result.unwrap_err(), RateTableError::Overlap { day: 10 });
    }

    #[test]
    fn test_rejects_gap() {
        let result = RateTable::new(vec![
            RateTier::bounded(1, 10, Rate::from_percentage(dec!(1.0))),
            RateTier::bounded(15, 20, Rate::from_percentage(dec!(2.0))),
        ]);
        assert_eq!(
            result.unwrap_err(),
            RateTableError::Gap {
                gap_start: 11,
                gap_end: 14,
            }
        );
    }

    #[test]
    fn test_rejects_open_ended_before_last() {
        let result = RateTable::new(vec![
            RateTier::open_ended(1, Rate::from_percentage(dec!(1.0))),
            RateTier::bounded(10, 20, Rate::from_percentage(dec!(2.0))),
        ]);
        assert_eq!(
            result.unwrap_err(),
            RateTableError::OpenEndedNotLast { min_days: 1 }
        );
    }

    #[test]
    fn test_rejects_min_days_zero() {
        let result = RateTable::new(vec![RateTier::bounded(
            0,
            5,
            Rate::from_percentage(dec!(1.0)),
        )]);
        assert_eq!(result.unwrap_err(), RateTableError::MinDaysBelowOne(0));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result = RateTable::new(vec![RateTier::bounded(
            10,
            5,
            Rate::from_percentage(dec!(1.0)),
        )]);
        assert!(matches!(
            result.unwrap_err(),
            RateTableError::InvertedBounds { .. }
        ));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let result = RateTable::new(vec![RateTier::bounded(
            1,
            5,
            Rate::from_percentage(dec!(-1.0)),
        )]);
        assert!(matches!(
            result.unwrap_err(),
            RateTableError::NegativeRate { .. }
        ));
    }

    #[test]
    fn test_adjacent_tiers_accepted() {
        // max 10 followed by min 11 is seamless coverage, not a gap.
        assert!(RateTable::new(vec![
            RateTier::bounded(1, 10, Rate::from_percentage(dec!(1.0))),
            RateTier::bounded(11, 20, Rate::from_percentage(dec!(2.0))),
        ])
        .is_ok());
    }

    #[test]
    fn test_deserializes_from_settings_json() {
        let json = r#"[
            {"min_days": 1, "max_days": 6, "rate": "1.0"},
            {"min_days": 7, "max_days": 14, "rate": "2.0"},
            {"min_days": 15, "max_days": 29, "rate": "3.0"},
            {"min_days": 30, "rate": "5.0"}
        ]"#;

        let table: RateTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.resolve(10), Rate::from_percentage(dec!(2.0)));
    }

    #[test]
    fn test_deserialization_rejects_invalid_table() {
        let json = r#"[
            {"min_days": 1, "max_days": 10, "rate": "1.0"},
            {"min_days": 5, "max_days": 20, "rate": "2.0"}
        ]"#;

        assert!(serde_json::from_str::<RateTable>(json).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    proptest! {
        #[test]
        fn resolve_is_total(days in 1u32..5000) {
            let table = RateTable::default();
            // Resolution never panics and always yields a usable rate.
            let rate = table.resolve(days);
            prop_assert!(!rate.as_percentage().is_sign_negative());
        }

        #[test]
        fn resolve_is_monotonic_on_increasing_tables(days_a in 1u32..2000, days_b in 1u32..2000) {
            // A well-configured product table pays longer terms at least
            // as much per day as shorter ones.
            let table = RateTable::default();
            let (lo, hi) = if days_a <= days_b { (days_a, days_b) } else { (days_b, days_a) };
            prop_assert!(table.resolve(lo).as_percentage() <= table.resolve(hi).as_percentage());
        }

        #[test]
        fn resolve_never_invents_rates(days in 1u32..5000) {
            let table = RateTable::default();
            let resolved = table.resolve(days);
            let known: Vec<Decimal> = table
                .tiers()
                .iter()
                .map(|t| t.rate.as_percentage())
                .collect();
            prop_assert!(known.contains(&resolved.as_percentage()));
        }
    }
}
