//! Maturity settlement processor
//!
//! Closes investments whose maturity date has passed: claims them through
//! the store's atomic conditional transition, credits principal plus the
//! frozen-input final profit to the owner's wallet together with two
//! completed deposit ledger entries, then refreshes the owner's VIP tier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use core_kernel::Money;
use domain_investment::{Investment, InvestmentStore};
use domain_wallet::{LedgerEntry, WalletStore};

use crate::config::EngineConfig;
use crate::error::{EngineError, ProcessingError};
use crate::summary::SettlementSummary;
use crate::vip::VipRecalculator;
use crate::DEFAULT_BATCH_SIZE;

/// Periodic, idempotent settlement job
///
/// The claim is the mutual-exclusion mechanism: two concurrent runs can
/// never both own the same investment, so funds are credited exactly
/// once. A failure after the claim leaves the row completed but
/// uncredited; that is the distinct partial-credit error class, surfaced
/// in the summary and never swallowed.
pub struct SettlementProcessor<I, W>
where
    I: InvestmentStore + ?Sized,
    W: WalletStore + ?Sized,
{
    investments: Arc<I>,
    wallets: Arc<W>,
    batch_size: u32,
}

impl<I, W> SettlementProcessor<I, W>
where
    I: InvestmentStore + ?Sized,
    W: WalletStore + ?Sized,
{
    pub fn new(investments: Arc<I>, wallets: Arc<W>) -> Self {
        Self {
            investments,
            wallets,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Runs one settlement pass at `now`
    pub async fn run(&self, now: DateTime<Utc>, config: &EngineConfig) -> SettlementSummary {
        let mut summary = SettlementSummary::default();

        let claimed = match self.investments.claim_matured(now, self.batch_size).await {
            Ok(claimed) => claimed,
            Err(e) => {
                error!(error = %e, "settlement claim failed");
                summary.errors.push(ProcessingError::batch(&e));
                return summary;
            }
        };
        summary.claimed = claimed.len();

        for investment in &claimed {
            match self.settle_one(investment, now, config).await {
                Ok(total) => {
                    summary.settled += 1;
                    summary.total_returned = summary.total_returned + total;
                }
                Err(e) => {
                    // The claim went through but the credit did not. The
                    // investment is completed without its funds; keep it
                    // loud for operator reconciliation.
                    error!(
                        investment = %investment.id,
                        owner = %investment.owner_id,
                        error = %e,
                        "partial credit: claimed investment was not credited"
                    );
                    summary.errors.push(ProcessingError::partial_credit(
                        investment.id,
                        investment.owner_id,
                        &e,
                    ));
                }
            }
        }

        if summary.claimed > 0 {
            info!(
                claimed = summary.claimed,
                settled = summary.settled,
                total_returned = %summary.total_returned,
                "settlement run complete"
            );
        }

        summary
    }

    /// Credits one claimed investment: wallet increment plus both ledger
    /// entries as a single store operation, then the VIP refresh.
    async fn settle_one(
        &self,
        investment: &Investment,
        now: DateTime<Utc>,
        config: &EngineConfig,
    ) -> Result<Money, EngineError> {
        // Authoritative value from frozen inputs; the incrementally
        // accrued total is display-only and may lag.
        let final_profit = investment.final_profit();
        let total_return = investment.principal_amount + final_profit;

        let principal_entry = LedgerEntry::completed_deposit(
            investment.owner_id,
            investment.principal_amount,
            format!(
                "Principal returned for matured {}-day investment {} at {} daily",
                investment.term_days, investment.id, investment.daily_profit_rate
            ),
            now,
        )?;
        let profit_entry = LedgerEntry::completed_deposit(
            investment.owner_id,
            final_profit,
            format!(
                "Profit for {}-day investment {} at {} daily",
                investment.term_days, investment.id, investment.daily_profit_rate
            ),
            now,
        )?;

        self.wallets
            .credit_with_entries(
                investment.owner_id,
                total_return,
                vec![principal_entry, profit_entry],
            )
            .await?;

        debug!(
            investment = %investment.id,
            owner = %investment.owner_id,
            total = %total_return,
            "settled investment"
        );

        // Two completed deposits just landed; refresh the owner's tier.
        // A failure here is not a partial credit (the funds are in): the
        // recomputation is idempotent and the next VIP pass repairs it.
        if let Err(e) = VipRecalculator::new(self.wallets.clone())
            .recompute_user(investment.owner_id, &config.vip_thresholds)
            .await
        {
            tracing::warn!(
                owner = %investment.owner_id,
                error = %e,
                "vip refresh after settlement failed"
            );
        }

        Ok(total_return)
    }
}
