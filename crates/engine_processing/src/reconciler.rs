//! Status reconciler
//!
//! Safety net for status/maturity drift. Read-heavy and safe to run
//! frequently. It never credits funds itself: overdue active rows are
//! routed through the settlement processor so the claim-and-credit path
//! stays the only way money moves; premature completions (impossible
//! under correct operation) are reverted to active and reported.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use domain_investment::InvestmentStore;
use domain_wallet::WalletStore;

use crate::config::EngineConfig;
use crate::error::ProcessingError;
use crate::settlement::SettlementProcessor;
use crate::summary::ReconcileSummary;

pub struct StatusReconciler<I, W>
where
    I: InvestmentStore + ?Sized,
    W: WalletStore + ?Sized,
{
    investments: Arc<I>,
    wallets: Arc<W>,
}

impl<I, W> StatusReconciler<I, W>
where
    I: InvestmentStore + ?Sized,
    W: WalletStore + ?Sized,
{
    pub fn new(investments: Arc<I>, wallets: Arc<W>) -> Self {
        Self {
            investments,
            wallets,
        }
    }

    /// Runs one reconciliation pass at `now`
    pub async fn run(&self, now: DateTime<Utc>, config: &EngineConfig) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        // Active rows past maturity: should have settled already (e.g. a
        // missed run). Count the drift, then settle through the normal
        // claim path rather than flipping status here.
        match self.investments.count_overdue_active(now).await {
            Ok(overdue) => {
                summary.overdue_active = overdue;
                if overdue > 0 {
                    warn!(overdue, "found active investments past maturity");
                    summary.settlement =
                        SettlementProcessor::new(self.investments.clone(), self.wallets.clone())
                            .run(now, config)
                            .await;
                }
            }
            Err(e) => {
                error!(error = %e, "overdue scan failed");
                summary.errors.push(ProcessingError::batch(&e));
            }
        }

        // Completed rows before maturity: a broken invariant, not a missed
        // run. Revert and report; any credit that accompanied the
        // premature completion is an operator matter, so keep the ids loud.
        match self.investments.revert_premature_completions(now).await {
            Ok(reverted) => {
                summary.reverted_premature = reverted.len() as u64;
                for id in &reverted {
                    warn!(investment = %id, "reverted premature completion to active");
                }
            }
            Err(e) => {
                error!(error = %e, "premature completion scan failed");
                summary.errors.push(ProcessingError::batch(&e));
            }
        }

        if summary.corrected() > 0 {
            info!(
                overdue_active = summary.overdue_active,
                reverted_premature = summary.reverted_premature,
                "reconciliation corrected drift"
            );
        }

        summary
    }
}
