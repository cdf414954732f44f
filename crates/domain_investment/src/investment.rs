//! Investment aggregate
//!
//! The aggregate freezes its financial inputs (principal, rate, term) at
//! creation. The accrual fields move only forward, and the status can make
//! exactly one transition, `Active -> Completed`, once maturity has passed.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{InvestmentId, Money, Rate, UserId};

use crate::error::InvestmentError;
use crate::rate::RateTable;

/// Investment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    /// Accruing; eligible for settlement once maturity passes
    Active,
    /// Settled; principal and profit credited exactly once
    Completed,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Completed => "completed",
        }
    }
}

/// A fixed-term, fixed-rate funded position held by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    /// Unique identifier
    pub id: InvestmentId,
    /// Owning user
    pub owner_id: UserId,
    /// Funded principal, positive, frozen at creation
    pub principal_amount: Money,
    /// Daily profit rate (percent), resolved at creation and frozen
    pub daily_profit_rate: Rate,
    /// Term length in days, frozen at creation
    pub term_days: u32,
    /// Running profit total; monotone non-decreasing while active
    pub accrued_profit: Money,
    /// Creation time plus `term_days` whole days; immutable
    pub maturity_date: DateTime<Utc>,
    /// High-water mark of the accrual window; advances only forward
    pub last_accrual_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: InvestmentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Investment {
    /// Opens a new investment at `now`
    ///
    /// Resolves the daily rate from the tier table and freezes it for the
    /// investment's lifetime, and derives the maturity date from the term.
    ///
    /// # Errors
    ///
    /// Returns an error if the principal is not positive or the term is
    /// below one day.
    pub fn open(
        owner_id: UserId,
        principal: Decimal,
        term_days: u32,
        rates: &RateTable,
        now: DateTime<Utc>,
    ) -> Result<Self, InvestmentError> {
        if principal <= Decimal::ZERO {
            return Err(InvestmentError::NonPositivePrincipal(principal));
        }
        if term_days < 1 {
            return Err(InvestmentError::TermBelowOneDay(term_days));
        }

        Ok(Self {
            id: InvestmentId::new_v7(),
            owner_id,
            principal_amount: Money::new(principal),
            daily_profit_rate: rates.resolve(term_days),
            term_days,
            accrued_profit: Money::zero(),
            maturity_date: now + Duration::days(term_days as i64),
            last_accrual_at: now,
            status: InvestmentStatus::Active,
            created_at: now,
        })
    }

    /// Returns true once the maturity date has passed
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.maturity_date <= now
    }

    /// Profit paid per whole day of the term
    pub fn daily_profit(&self) -> Money {
        self.daily_profit_rate.apply(&self.principal_amount)
    }

    /// Whole days elapsed since the last accrual, clamped at zero
    pub fn elapsed_accrual_days(&self, now: DateTime<Utc>) -> u32 {
        (now - self.last_accrual_at).num_days().max(0) as u32
    }

    /// Days the accrual processor may credit at `now`: whole elapsed days,
    /// capped at the term length
    pub fn accruable_days(&self, now: DateTime<Utc>) -> u32 {
        self.elapsed_accrual_days(now).min(self.term_days)
    }

    /// Profit delta for a number of credited days
    pub fn accrual_delta(&self, days: u32) -> Money {
        self.daily_profit().multiply(Decimal::from(days))
    }

    /// Final profit, recomputed from the frozen inputs
    ///
    /// This is the authoritative settlement value. The incrementally
    /// accrued total is informational display and may lag it (for example
    /// after a missed accrual tick).
    pub fn final_profit(&self) -> Money {
        self.accrual_delta(self.term_days)
    }

    /// Principal plus final profit
    pub fn total_return(&self) -> Money {
        self.principal_amount + self.final_profit()
    }

    /// Upper bound the accrued profit may never exceed
    pub fn profit_cap(&self) -> Money {
        self.final_profit()
    }
}
