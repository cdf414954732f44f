//! Wallet store adapter
//!
//! The settlement credit is one database transaction: an atomic balance
//! increment plus the ledger inserts, so claim→credit→ledger stays as
//! tight as the storage allows. Balance arithmetic always happens in SQL
//! (`balance = balance + $n`), never as read-modify-write in Rust.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{LedgerEntryId, Money, StoreError, UserId};
use domain_wallet::{EntryKind, EntryStatus, LedgerEntry, WalletStore};

use crate::error::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PgWalletStore {
    pool: PgPool,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn balance(&self, user: UserId) -> Result<Money, StoreError> {
        let balance: Option<Decimal> =
            sqlx::query_scalar("SELECT balance FROM users WHERE user_id = $1")
                .bind(user.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("fetch balance", e))?;

        balance
            .map(Money::new)
            .ok_or_else(|| StoreError::not_found("UserWallet", user))
    }

    async fn credit_with_entries(
        &self,
        user: UserId,
        total: Money,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin credit transaction", e))?;

        let updated = sqlx::query("UPDATE users SET balance = balance + $2 WHERE user_id = $1")
            .bind(user.as_uuid())
            .bind(total.amount())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("credit balance", e))?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::not_found("UserWallet", user));
        }

        for entry in &entries {
            insert_entry(&mut tx, entry).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit credit transaction", e))?;

        Ok(())
    }

    async fn admin_debit(&self, user: UserId, amount: Money) -> Result<(), StoreError> {
        // Intentionally ledgerless; the balance check rides on the same
        // conditional update.
        let updated = sqlx::query(
            "UPDATE users SET balance = balance - $2 WHERE user_id = $1 AND balance >= $2",
        )
        .bind(user.as_uuid())
        .bind(amount.amount())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("admin debit", e))?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::conflict(format!(
                "user {user} missing or balance below {amount}"
            )));
        }
        Ok(())
    }

    async fn append_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin append transaction", e))?;
        insert_entry(&mut tx, entry).await?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit append transaction", e))?;
        Ok(())
    }

    async fn entries_for(&self, user: UserId) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows: Vec<LedgerEntryRow> = sqlx::query_as(
            r#"
            SELECT entry_id, owner_id, kind, status, amount, description, created_at
            FROM wallet_ledger_entries
            WHERE owner_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list ledger entries", e))?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }

    async fn completed_deposit_total(&self, user: UserId) -> Result<Money, StoreError> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM wallet_ledger_entries
            WHERE owner_id = $1 AND kind = 'deposit' AND status = 'completed'
            "#,
        )
        .bind(user.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("sum completed deposits", e))?;

        Ok(Money::new(total))
    }

    async fn set_vip_tier(&self, user: UserId, tier: u32) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET vip_tier = $2 WHERE user_id = $1")
            .bind(user.as_uuid())
            .bind(tier as i32)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("set vip tier", e))?;
        Ok(())
    }

    async fn vip_tier(&self, user: UserId) -> Result<u32, StoreError> {
        let tier: Option<i32> = sqlx::query_scalar("SELECT vip_tier FROM users WHERE user_id = $1")
            .bind(user.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch vip tier", e))?;

        tier.map(|t| t as u32)
            .ok_or_else(|| StoreError::not_found("UserWallet", user))
    }

    async fn all_user_ids(&self) -> Result<Vec<UserId>, StoreError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT user_id FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list users", e))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}

async fn insert_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entry: &LedgerEntry,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO wallet_ledger_entries (
            entry_id, owner_id, kind, status, amount, description, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id.as_uuid())
    .bind(entry.owner_id.as_uuid())
    .bind(entry.kind.as_str())
    .bind(entry.status.as_str())
    .bind(entry.amount.amount())
    .bind(&entry.description)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert ledger entry", e))?;

    Ok(())
}

/// Raw database row, converted after fetch
#[derive(Debug, sqlx::FromRow)]
struct LedgerEntryRow {
    entry_id: Uuid,
    owner_id: Uuid,
    kind: String,
    status: String,
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LedgerEntryRow> for LedgerEntry {
    type Error = StoreError;

    fn try_from(row: LedgerEntryRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "deposit" => EntryKind::Deposit,
            "withdraw" => EntryKind::Withdraw,
            other => {
                return Err(StoreError::serialization(format!(
                    "unknown ledger kind '{other}'"
                )))
            }
        };
        let status = match row.status.as_str() {
            "pending" => EntryStatus::Pending,
            "completed" => EntryStatus::Completed,
            "failed" => EntryStatus::Failed,
            "cancelled" => EntryStatus::Cancelled,
            other => {
                return Err(StoreError::serialization(format!(
                    "unknown ledger status '{other}'"
                )))
            }
        };

        Ok(LedgerEntry {
            id: LedgerEntryId::from_uuid(row.entry_id),
            owner_id: UserId::from_uuid(row.owner_id),
            kind,
            status,
            amount: Money::new(row.amount),
            description: row.description,
            created_at: row.created_at,
        })
    }
}
