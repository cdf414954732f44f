//! Investment store port
//!
//! The port every investment persistence adapter implements. The two
//! conditional operations (`apply_accrual`, `claim_matured`) are the
//! engine's only concurrency primitives: they must be atomic row updates
//! in whatever storage backs the trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{CasOutcome, InvestmentId, Money, StoreError};

use crate::investment::Investment;

#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Persists a newly opened investment
    async fn insert(&self, investment: &Investment) -> Result<(), StoreError>;

    /// Fetches an investment by id
    async fn get(&self, id: InvestmentId) -> Result<Option<Investment>, StoreError>;

    /// Lists active investments whose maturity date is still in the
    /// future, up to `limit` rows
    async fn list_accruable(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Investment>, StoreError>;

    /// Adds `profit_delta` to the accrued profit and advances
    /// `last_accrual_at` to `accrued_at`, but only if the row still holds
    /// `observed_last_accrual`
    ///
    /// The compare-and-set guard is what prevents two overlapping accrual
    /// runs from crediting the same elapsed window twice. A `Lost` outcome
    /// means a concurrent run already advanced the window; the caller
    /// skips the row.
    async fn apply_accrual(
        &self,
        id: InvestmentId,
        observed_last_accrual: DateTime<Utc>,
        profit_delta: Money,
        accrued_at: DateTime<Utc>,
    ) -> Result<CasOutcome, StoreError>;

    /// Claims every active investment whose maturity date has passed, up
    /// to `limit` rows
    ///
    /// The claim is one atomic conditional transition: each returned row
    /// was flipped `active -> completed` with its accrued profit finalized
    /// to the frozen-input recomputation, and is owned exclusively by this
    /// caller. Two concurrent invocations can never both claim the same
    /// row; unclaimed rows stay eligible for the next run.
    async fn claim_matured(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Investment>, StoreError>;

    /// Counts active investments whose maturity date has already passed
    ///
    /// Used by the reconciler to report drift before routing those rows
    /// through settlement.
    async fn count_overdue_active(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Flips completed investments whose maturity date is still in the
    /// future back to active, returning the affected ids
    ///
    /// Defensive invariant repair: such rows cannot exist under correct
    /// operation.
    async fn revert_premature_completions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvestmentId>, StoreError>;
}
