//! Canonical configuration fixtures

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use core_kernel::Rate;
use domain_investment::{RateTable, RateTier};
use domain_wallet::VipThresholds;
use engine_processing::EngineConfig;

static PRODUCT_RATE_TABLE: Lazy<RateTable> = Lazy::new(|| {
    RateTable::new(vec![
        RateTier::bounded(1, 6, Rate::from_percentage(dec!(1.0))),
        RateTier::bounded(7, 14, Rate::from_percentage(dec!(2.0))),
        RateTier::bounded(15, 29, Rate::from_percentage(dec!(3.0))),
        RateTier::open_ended(30, Rate::from_percentage(dec!(5.0))),
    ])
    .expect("product rate table is valid")
});

/// The product's four-tier rate table
pub fn product_rate_table() -> RateTable {
    PRODUCT_RATE_TABLE.clone()
}

/// The product's two-step VIP thresholds (50M, 150M)
pub fn vip_thresholds() -> VipThresholds {
    VipThresholds::new(vec![dec!(50_000_000), dec!(150_000_000)])
        .expect("product thresholds are valid")
}

/// A complete engine configuration from the fixtures above
pub fn engine_config() -> EngineConfig {
    EngineConfig {
        rate_table: product_rate_table(),
        vip_thresholds: vip_thresholds(),
    }
}

/// A fixed reference instant so tests are deterministic
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
}
