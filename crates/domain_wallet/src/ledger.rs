//! Append-only wallet ledger entries
//!
//! Every wallet balance change is recorded as a ledger entry (with the
//! single, intentional exception of administrative debit adjustments).
//! Entries are never updated or deleted; the balance is a fold over them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{LedgerEntryId, Money, UserId};

use crate::error::LedgerError;

/// Direction of a fund movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Withdraw,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "deposit",
            EntryKind::Withdraw => "withdraw",
        }
    }
}

/// Processing status of a fund movement
///
/// Only `Completed` entries affect the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Completed => "completed",
            EntryStatus::Failed => "failed",
            EntryStatus::Cancelled => "cancelled",
        }
    }
}

/// An append-only record of a fund movement affecting a wallet balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub owner_id: UserId,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub amount: Money,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a ledger entry
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or the description
    /// is empty.
    pub fn new(
        owner_id: UserId,
        kind: EntryKind,
        status: EntryStatus,
        amount: Money,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount(amount.amount()));
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }

        Ok(Self {
            id: LedgerEntryId::new_v7(),
            owner_id,
            kind,
            status,
            amount,
            description,
            created_at: now,
        })
    }

    /// Creates an already-completed deposit entry (the settlement credit shape)
    pub fn completed_deposit(
        owner_id: UserId,
        amount: Money,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        Self::new(
            owner_id,
            EntryKind::Deposit,
            EntryStatus::Completed,
            amount,
            description,
            now,
        )
    }

    /// The entry's contribution to the wallet balance
    ///
    /// Positive for completed deposits, negative for completed withdraws,
    /// zero for anything not completed.
    pub fn balance_effect(&self) -> Money {
        if self.status != EntryStatus::Completed {
            return Money::zero();
        }
        match self.kind {
            EntryKind::Deposit => self.amount,
            EntryKind::Withdraw => -self.amount,
        }
    }

    /// True for entries counting toward the VIP cumulative deposit sum
    pub fn is_completed_deposit(&self) -> bool {
        self.kind == EntryKind::Deposit && self.status == EntryStatus::Completed
    }
}

/// Folds entries into the balance they imply
///
/// The wallet balance column must equal this fold plus any administrative
/// adjustments; the invariant tests lean on it.
pub fn ledger_balance<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Money {
    entries
        .into_iter()
        .fold(Money::zero(), |acc, e| acc + e.balance_effect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(kind: EntryKind, status: EntryStatus, amount: i64) -> LedgerEntry {
        LedgerEntry::new(
            UserId::new(),
            kind,
            status,
            Money::new(amount.into()),
            "test entry",
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let result = LedgerEntry::completed_deposit(
            UserId::new(),
            Money::zero(),
            "zero deposit",
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), LedgerError::NonPositiveAmount(dec!(0)));
    }

    #[test]
    fn test_rejects_empty_description() {
        let result = LedgerEntry::completed_deposit(
            UserId::new(),
            Money::new(dec!(100)),
            "   ",
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), LedgerError::EmptyDescription);
    }

    #[test]
    fn test_balance_effect_by_kind_and_status() {
        assert_eq!(
            entry(EntryKind::Deposit, EntryStatus::Completed, 100)
                .balance_effect()
                .amount(),
            dec!(100)
        );
        assert_eq!(
            entry(EntryKind::Withdraw, EntryStatus::Completed, 40)
                .balance_effect()
                .amount(),
            dec!(-40)
        );
        assert!(entry(EntryKind::Deposit, EntryStatus::Pending, 100)
            .balance_effect()
            .is_zero());
        assert!(entry(EntryKind::Withdraw, EntryStatus::Failed, 100)
            .balance_effect()
            .is_zero());
        assert!(entry(EntryKind::Deposit, EntryStatus::Cancelled, 100)
            .balance_effect()
            .is_zero());
    }

    #[test]
    fn test_ledger_balance_fold() {
        let entries = vec![
            entry(EntryKind::Deposit, EntryStatus::Completed, 1000),
            entry(EntryKind::Withdraw, EntryStatus::Completed, 300),
            entry(EntryKind::Deposit, EntryStatus::Pending, 9999),
        ];
        assert_eq!(ledger_balance(&entries).amount(), dec!(700));
    }
}
