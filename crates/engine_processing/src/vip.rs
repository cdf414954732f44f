//! VIP tier recomputation
//!
//! The tier is a pure function of cumulative completed deposits and the
//! threshold table, so recomputation is idempotent: re-running it with
//! unchanged inputs writes the same tier again. It runs after every
//! settlement credit and as a full pass when the thresholds change.

use std::sync::Arc;

use tracing::{debug, warn};

use core_kernel::{StoreError, UserId};
use domain_wallet::{VipThresholds, WalletStore};

use crate::error::ProcessingError;
use crate::summary::VipSummary;

pub struct VipRecalculator<W: WalletStore + ?Sized> {
    wallets: Arc<W>,
}

impl<W: WalletStore + ?Sized> VipRecalculator<W> {
    pub fn new(wallets: Arc<W>) -> Self {
        Self { wallets }
    }

    /// Recomputes and stores one user's tier, returning it
    pub async fn recompute_user(
        &self,
        user: UserId,
        thresholds: &VipThresholds,
    ) -> Result<u32, StoreError> {
        let cumulative = self.wallets.completed_deposit_total(user).await?;
        let tier = thresholds.tier_for(cumulative);
        self.wallets.set_vip_tier(user, tier).await?;

        debug!(user = %user, cumulative = %cumulative, tier, "vip tier recomputed");
        Ok(tier)
    }

    /// Recomputes every user, e.g. after a threshold-table update
    ///
    /// Per-user failures are collected and do not stop the pass.
    pub async fn recompute_all(&self, thresholds: &VipThresholds) -> VipSummary {
        let mut summary = VipSummary::default();

        let users = match self.wallets.all_user_ids().await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "vip recomputation user listing failed");
                summary.errors.push(ProcessingError::batch(&e));
                return summary;
            }
        };
        summary.scanned = users.len();

        for user in users {
            match self.recompute_user(user, thresholds).await {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    warn!(user = %user, error = %e, "vip recomputation failed");
                    summary.errors.push(ProcessingError::user(user, &e));
                }
            }
        }

        summary
    }
}
