//! Entity builders for tests

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{InvestmentId, Money, Rate, UserId};
use domain_investment::{Investment, InvestmentStatus};

/// Builder for investments in arbitrary lifecycle states
///
/// Defaults to the canonical scenario: 1,000,000 principal over 7 days at
/// 2.00% daily, opened at the given instant.
pub struct InvestmentBuilder {
    owner_id: UserId,
    principal: Decimal,
    term_days: u32,
    rate_percent: Decimal,
    opened_at: DateTime<Utc>,
    status: InvestmentStatus,
    accrued_profit: Decimal,
}

impl InvestmentBuilder {
    pub fn new(opened_at: DateTime<Utc>) -> Self {
        Self {
            owner_id: UserId::new(),
            principal: dec!(1_000_000),
            term_days: 7,
            rate_percent: dec!(2.0),
            opened_at,
            status: InvestmentStatus::Active,
            accrued_profit: dec!(0),
        }
    }

    pub fn owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn principal(mut self, principal: Decimal) -> Self {
        self.principal = principal;
        self
    }

    pub fn term_days(mut self, term_days: u32) -> Self {
        self.term_days = term_days;
        self
    }

    pub fn rate_percent(mut self, rate_percent: Decimal) -> Self {
        self.rate_percent = rate_percent;
        self
    }

    /// Moves the opening back so the investment matured `days` ago
    pub fn matured_days_ago(mut self, days: i64) -> Self {
        self.opened_at = self.opened_at - Duration::days(self.term_days as i64 + days);
        self
    }

    pub fn status(mut self, status: InvestmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn accrued_profit(mut self, accrued: Decimal) -> Self {
        self.accrued_profit = accrued;
        self
    }

    pub fn build(self) -> Investment {
        Investment {
            id: InvestmentId::new_v7(),
            owner_id: self.owner_id,
            principal_amount: Money::new(self.principal),
            daily_profit_rate: Rate::from_percentage(self.rate_percent),
            term_days: self.term_days,
            accrued_profit: Money::new(self.accrued_profit),
            maturity_date: self.opened_at + Duration::days(self.term_days as i64),
            last_accrual_at: self.opened_at,
            status: self.status,
            created_at: self.opened_at,
        }
    }
}
