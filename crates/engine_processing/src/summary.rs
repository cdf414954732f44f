//! Batch run summaries
//!
//! Each processor returns one of these; the trigger endpoints serialize
//! them into the scheduler-facing JSON response.

use serde::Serialize;

use core_kernel::Money;

use crate::error::ProcessingError;

/// Outcome of one accrual run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccrualSummary {
    /// Rows selected for this batch
    pub scanned: usize,
    /// Rows whose accrual window advanced
    pub accrued: usize,
    /// Rows skipped: no whole day elapsed, or a concurrent run won the
    /// compare-and-set
    pub skipped: usize,
    /// Total profit added across the batch
    pub total_accrued: Money,
    pub errors: Vec<ProcessingError>,
}

impl AccrualSummary {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of one settlement run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettlementSummary {
    /// Investments claimed by this run
    pub claimed: usize,
    /// Investments fully credited (wallet + ledger)
    pub settled: usize,
    /// Principal plus profit credited across the batch
    pub total_returned: Money,
    pub errors: Vec<ProcessingError>,
}

impl SettlementSummary {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// True if any claimed investment was left without its credit
    pub fn has_partial_credits(&self) -> bool {
        self.errors.iter().any(ProcessingError::is_partial_credit)
    }
}

/// Outcome of one reconciliation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    /// Active rows found past their maturity date (drift)
    pub overdue_active: u64,
    /// Completed rows found before their maturity date, reverted to
    /// active (defensive invariant repair)
    pub reverted_premature: u64,
    /// Settlement pass the overdue rows were routed through
    pub settlement: SettlementSummary,
    pub errors: Vec<ProcessingError>,
}

impl ReconcileSummary {
    pub fn success(&self) -> bool {
        self.errors.is_empty() && self.settlement.success()
    }

    /// Total rows whose status changed during reconciliation
    pub fn corrected(&self) -> u64 {
        self.settlement.claimed as u64 + self.reverted_premature
    }
}

/// Outcome of one VIP recomputation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct VipSummary {
    /// Users examined
    pub scanned: usize,
    /// Users whose stored tier was written
    pub updated: usize,
    pub errors: Vec<ProcessingError>,
}

impl VipSummary {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}
