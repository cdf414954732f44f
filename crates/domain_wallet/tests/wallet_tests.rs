//! Wallet domain integration tests

use chrono::Utc;
use rust_decimal_macros::dec;

use core_kernel::{Money, UserId};
use domain_wallet::{
    ledger_balance, EntryKind, EntryStatus, LedgerEntry, UserWallet, VipThresholds,
};

#[test]
fn a_settlement_pair_of_entries_raises_balance_and_tier_inputs() {
    let owner = UserId::new();
    let now = Utc::now();

    let principal = LedgerEntry::completed_deposit(
        owner,
        Money::new(dec!(60_000_000)),
        "Principal returned for matured 7-day investment",
        now,
    )
    .unwrap();
    let profit = LedgerEntry::completed_deposit(
        owner,
        Money::new(dec!(8_400_000)),
        "Profit for 7-day investment at 2.0% daily",
        now,
    )
    .unwrap();

    let entries = vec![principal, profit];
    assert_eq!(ledger_balance(&entries).amount(), dec!(68_400_000));

    // Both entries feed the VIP sum, pushing past the first threshold.
    let cumulative: Money = entries
        .iter()
        .filter(|e| e.is_completed_deposit())
        .map(|e| e.amount)
        .sum();
    let thresholds = VipThresholds::default();
    assert_eq!(thresholds.tier_for(cumulative), 1);
}

#[test]
fn only_completed_movements_shape_the_balance() {
    let owner = UserId::new();
    let now = Utc::now();
    let mut entries = Vec::new();

    for (kind, status, amount) in [
        (EntryKind::Deposit, EntryStatus::Completed, dec!(10_000)),
        (EntryKind::Deposit, EntryStatus::Pending, dec!(99_999)),
        (EntryKind::Withdraw, EntryStatus::Completed, dec!(2_500)),
        (EntryKind::Withdraw, EntryStatus::Cancelled, dec!(99_999)),
        (EntryKind::Withdraw, EntryStatus::Failed, dec!(99_999)),
    ] {
        entries.push(
            LedgerEntry::new(owner, kind, status, Money::new(amount), "movement", now).unwrap(),
        );
    }

    assert_eq!(ledger_balance(&entries).amount(), dec!(7_500));
}

#[test]
fn a_fresh_wallet_starts_empty_at_tier_zero() {
    let wallet = UserWallet::new(UserId::new());
    assert!(wallet.balance.is_zero());
    assert_eq!(wallet.vip_tier, 0);
}
