//! Wallet store port
//!
//! Balance mutations go through this port only. The settlement credit is a
//! single operation so the adapter can keep the balance increment and the
//! ledger appends in one atomic unit; the administrative debit is the one
//! sanctioned ledgerless mutation.

use async_trait::async_trait;

use core_kernel::{Money, StoreError, UserId};

use crate::ledger::LedgerEntry;

#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Current wallet balance
    async fn balance(&self, user: UserId) -> Result<Money, StoreError>;

    /// Credits the balance and appends the given ledger entries as one
    /// atomic unit
    ///
    /// The balance change must be an atomic in-store increment, never a
    /// read-modify-write, so concurrent settlements for the same user
    /// serialize correctly. Either the increment and every entry land, or
    /// nothing does.
    async fn credit_with_entries(
        &self,
        user: UserId,
        total: Money,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError>;

    /// Administrative debit adjustment, intentionally ledgerless
    ///
    /// Support-desk corrections mutate the balance without a ledger entry.
    /// Fails with a conflict if the balance would go negative.
    async fn admin_debit(&self, user: UserId, amount: Money) -> Result<(), StoreError>;

    /// Appends a single ledger entry without touching the balance
    /// (pending/failed/cancelled records)
    async fn append_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// All ledger entries for a user, oldest first
    async fn entries_for(&self, user: UserId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Sum of completed deposit entries for a user
    async fn completed_deposit_total(&self, user: UserId) -> Result<Money, StoreError>;

    /// Stores a recomputed VIP tier
    async fn set_vip_tier(&self, user: UserId, tier: u32) -> Result<(), StoreError>;

    /// Current VIP tier
    async fn vip_tier(&self, user: UserId) -> Result<u32, StoreError>;

    /// Every known user id, for full recomputation passes
    async fn all_user_ids(&self) -> Result<Vec<UserId>, StoreError>;
}
