//! Investment domain integration tests

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Rate, UserId};
use domain_investment::{Investment, InvestmentStatus, RateTable, RateTier};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

#[test]
fn opening_resolves_the_rate_from_the_tier_table() {
    let table = RateTable::default();

    let week = Investment::open(UserId::new(), dec!(1_000_000), 7, &table, now()).unwrap();
    let month = Investment::open(UserId::new(), dec!(1_000_000), 30, &table, now()).unwrap();
    let year = Investment::open(UserId::new(), dec!(1_000_000), 365, &table, now()).unwrap();

    assert_eq!(week.daily_profit_rate, Rate::from_percentage(dec!(2.0)));
    assert_eq!(month.daily_profit_rate, Rate::from_percentage(dec!(5.0)));
    assert_eq!(year.daily_profit_rate, Rate::from_percentage(dec!(5.0)));
}

#[test]
fn the_canonical_settlement_scenario() {
    // 1,000,000 over 7 days at 2.00%: profit 140,000, return 1,140,000.
    let table = RateTable::default();
    let investment = Investment::open(UserId::new(), dec!(1_000_000), 7, &table, now()).unwrap();

    assert_eq!(investment.final_profit().amount(), dec!(140_000));
    assert_eq!(investment.total_return().amount(), dec!(1_140_000));
    assert_eq!(investment.maturity_date, now() + Duration::days(7));
}

#[test]
fn a_replaced_table_does_not_move_frozen_rates() {
    let original = RateTable::default();
    let investment =
        Investment::open(UserId::new(), dec!(2_500_000), 10, &original, now()).unwrap();
    assert_eq!(investment.daily_profit_rate, Rate::from_percentage(dec!(2.0)));

    // Reconfiguring the product afterwards must not affect the position:
    // the rate was resolved once, at creation.
    let _replacement = RateTable::new(vec![RateTier::open_ended(
        1,
        Rate::from_percentage(dec!(9.9)),
    )])
    .unwrap();
    assert_eq!(investment.daily_profit_rate, Rate::from_percentage(dec!(2.0)));
    assert_eq!(investment.final_profit().amount(), dec!(500_000));
}

#[test]
fn accrual_arithmetic_matches_the_settlement_total_at_term() {
    let table = RateTable::default();
    let investment = Investment::open(UserId::new(), dec!(750_000), 14, &table, now()).unwrap();

    // Crediting the full term in day-sized steps lands exactly on the
    // frozen final profit.
    let step_total = (0..14).fold(core_kernel::Money::zero(), |acc, _| {
        acc + investment.accrual_delta(1)
    });
    assert_eq!(step_total, investment.final_profit());

    assert_eq!(investment.status, InvestmentStatus::Active);
}
