//! User wallet snapshot

use serde::{Deserialize, Serialize};

use core_kernel::{Money, UserId};

/// The wallet fields of a user row
///
/// `balance` is a materialized cache of the ledger; `vip_tier` is derived
/// from cumulative completed deposits. Neither is a source of truth on its
/// own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWallet {
    pub user_id: UserId,
    pub balance: Money,
    pub vip_tier: u32,
}

impl UserWallet {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: Money::zero(),
            vip_tier: 0,
        }
    }
}
