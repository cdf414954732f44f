//! Investment store adapter
//!
//! The two conditional updates here are the engine's concurrency
//! primitives. Both are single atomic statements: the accrual update is
//! guarded by the `last_accrual_at` the caller read, and the maturity
//! claim flips and finalizes rows in one `UPDATE ... RETURNING` so no two
//! runs can own the same investment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{CasOutcome, InvestmentId, Money, Rate, StoreError, UserId};
use domain_investment::{Investment, InvestmentStatus, InvestmentStore};

use crate::error::map_sqlx_error;

const SELECT_COLUMNS: &str = "investment_id, owner_id, principal_amount, daily_profit_rate, \
     term_days, accrued_profit, maturity_date, last_accrual_at, status, created_at";

#[derive(Debug, Clone)]
pub struct PgInvestmentStore {
    pool: PgPool,
}

impl PgInvestmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvestmentStore for PgInvestmentStore {
    async fn insert(&self, investment: &Investment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO investments (
                investment_id, owner_id, principal_amount, daily_profit_rate,
                term_days, accrued_profit, maturity_date, last_accrual_at,
                status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(investment.id.as_uuid())
        .bind(investment.owner_id.as_uuid())
        .bind(investment.principal_amount.amount())
        .bind(investment.daily_profit_rate.as_percentage())
        .bind(investment.term_days as i32)
        .bind(investment.accrued_profit.amount())
        .bind(investment.maturity_date)
        .bind(investment.last_accrual_at)
        .bind(investment.status.as_str())
        .bind(investment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert investment", e))?;

        Ok(())
    }

    async fn get(&self, id: InvestmentId) -> Result<Option<Investment>, StoreError> {
        let row: Option<InvestmentRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM investments WHERE investment_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get investment", e))?;

        row.map(Investment::try_from).transpose()
    }

    async fn list_accruable(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Investment>, StoreError> {
        let rows: Vec<InvestmentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM investments
            WHERE status = 'active' AND maturity_date > $1
            ORDER BY created_at
            LIMIT $2
            "#
        ))
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list accruable investments", e))?;

        rows.into_iter().map(Investment::try_from).collect()
    }

    async fn apply_accrual(
        &self,
        id: InvestmentId,
        observed_last_accrual: DateTime<Utc>,
        profit_delta: Money,
        accrued_at: DateTime<Utc>,
    ) -> Result<CasOutcome, StoreError> {
        // Compare-and-set: the write only lands if the row still holds
        // the accrual watermark this caller read.
        let result = sqlx::query(
            r#"
            UPDATE investments
            SET accrued_profit = accrued_profit + $3,
                last_accrual_at = $4
            WHERE investment_id = $1
              AND status = 'active'
              AND last_accrual_at = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(observed_last_accrual)
        .bind(profit_delta.amount())
        .bind(accrued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("apply accrual", e))?;

        Ok(if result.rows_affected() == 1 {
            CasOutcome::Applied
        } else {
            CasOutcome::Lost
        })
    }

    async fn claim_matured(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Investment>, StoreError> {
        // One atomic claim: flip the status and finalize the accrued
        // profit from the frozen inputs, returning only rows this caller
        // owns. SKIP LOCKED keeps concurrent runs off each other's rows.
        let rows: Vec<InvestmentRow> = sqlx::query_as(&format!(
            r#"
            UPDATE investments
            SET status = 'completed',
                accrued_profit = principal_amount * daily_profit_rate / 100 * term_days
            WHERE investment_id IN (
                SELECT investment_id FROM investments
                WHERE status = 'active' AND maturity_date <= $1
                ORDER BY maturity_date
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
              AND status = 'active'
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("claim matured investments", e))?;

        rows.into_iter().map(Investment::try_from).collect()
    }

    async fn count_overdue_active(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM investments WHERE status = 'active' AND maturity_date <= $1",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("count overdue investments", e))?;

        Ok(count as u64)
    }

    async fn revert_premature_completions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvestmentId>, StoreError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE investments
            SET status = 'active'
            WHERE status = 'completed' AND maturity_date > $1
            RETURNING investment_id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("revert premature completions", e))?;

        Ok(ids.into_iter().map(InvestmentId::from_uuid).collect())
    }
}

/// Raw database row, converted into the aggregate after fetch
#[derive(Debug, sqlx::FromRow)]
struct InvestmentRow {
    investment_id: Uuid,
    owner_id: Uuid,
    principal_amount: Decimal,
    daily_profit_rate: Decimal,
    term_days: i32,
    accrued_profit: Decimal,
    maturity_date: DateTime<Utc>,
    last_accrual_at: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = StoreError;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "active" => InvestmentStatus::Active,
            "completed" => InvestmentStatus::Completed,
            other => {
                return Err(StoreError::serialization(format!(
                    "unknown investment status '{other}'"
                )))
            }
        };

        Ok(Investment {
            id: InvestmentId::from_uuid(row.investment_id),
            owner_id: UserId::from_uuid(row.owner_id),
            principal_amount: Money::new(row.principal_amount),
            daily_profit_rate: Rate::from_percentage(row.daily_profit_rate),
            term_days: row.term_days as u32,
            accrued_profit: Money::new(row.accrued_profit),
            maturity_date: row.maturity_date,
            last_accrual_at: row.last_accrual_at,
            status,
            created_at: row.created_at,
        })
    }
}
