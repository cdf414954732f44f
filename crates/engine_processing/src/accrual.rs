//! Accrual processor
//!
//! Gives active investments a visibly growing profit total ahead of
//! maturity. Accrual is display bookkeeping: it writes no ledger entry
//! and moves no wallet funds; settlement recomputes the authoritative
//! final profit from the frozen inputs regardless of what accrued here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use core_kernel::CasOutcome;
use domain_investment::InvestmentStore;

use crate::error::ProcessingError;
use crate::summary::AccrualSummary;
use crate::DEFAULT_BATCH_SIZE;

/// Periodic, idempotent accrual job
///
/// Safe under overlapping invocations: the per-row compare-and-set on
/// `last_accrual_at` guarantees an elapsed window is credited at most
/// once, whichever run gets there first.
pub struct AccrualProcessor<S: InvestmentStore + ?Sized> {
    store: Arc<S>,
    batch_size: u32,
}

impl<S: InvestmentStore + ?Sized> AccrualProcessor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Runs one accrual pass at `now`
    ///
    /// Per-row failures are isolated: they are logged, collected into the
    /// summary, and do not stop the rest of the batch.
    pub async fn run(&self, now: DateTime<Utc>) -> AccrualSummary {
        let mut summary = AccrualSummary::default();

        let investments = match self.store.list_accruable(now, self.batch_size).await {
            Ok(investments) => investments,
            Err(e) => {
                warn!(error = %e, "accrual batch selection failed");
                summary.errors.push(ProcessingError::batch(&e));
                return summary;
            }
        };
        summary.scanned = investments.len();

        for investment in investments {
            let days = investment.accruable_days(now);
            if days < 1 {
                // Less than a whole day since the last accrual; a no-op,
                // not an error.
                summary.skipped += 1;
                continue;
            }

            let delta = investment.accrual_delta(days);
            match self
                .store
                .apply_accrual(investment.id, investment.last_accrual_at, delta, now)
                .await
            {
                Ok(CasOutcome::Applied) => {
                    debug!(
                        investment = %investment.id,
                        days,
                        delta = %delta,
                        "accrued profit"
                    );
                    summary.accrued += 1;
                    summary.total_accrued = summary.total_accrued + delta;
                }
                Ok(CasOutcome::Lost) => {
                    // A concurrent run already advanced this window.
                    debug!(investment = %investment.id, "lost accrual race, skipping");
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(investment = %investment.id, error = %e, "accrual update failed");
                    summary.errors.push(ProcessingError::store(investment.id, &e));
                }
            }
        }

        summary
    }
}
