//! Settings store adapter
//!
//! Generic key/value rows holding serialized JSON. The typed constructors
//! of `RateTable` and `VipThresholds` validate on deserialization, so a
//! malformed row surfaces as a serialization error instead of leaking an
//! invalid table into a processing run; absent rows fall back to the
//! engine defaults.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use core_kernel::StoreError;
use domain_investment::RateTable;
use domain_wallet::VipThresholds;
use engine_processing::config::{EngineConfig, RATE_TABLE_KEY, VIP_THRESHOLDS_KEY};
use engine_processing::SettingsStore;

use crate::error::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_value(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        sqlx::query_scalar("SELECT value FROM engine_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch setting", e))
    }

    async fn upsert_value(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO engine_settings (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert setting", e))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn load(&self) -> Result<EngineConfig, StoreError> {
        let rate_table = match self.fetch_value(RATE_TABLE_KEY).await? {
            Some(value) => serde_json::from_value::<RateTable>(value).map_err(|e| {
                StoreError::serialization(format!("stored rate table is invalid: {e}"))
            })?,
            None => {
                debug!("no rate table configured, using engine default");
                RateTable::default()
            }
        };

        let vip_thresholds = match self.fetch_value(VIP_THRESHOLDS_KEY).await? {
            Some(value) => serde_json::from_value::<VipThresholds>(value).map_err(|e| {
                StoreError::serialization(format!("stored vip thresholds are invalid: {e}"))
            })?,
            None => {
                debug!("no vip thresholds configured, using engine default");
                VipThresholds::default()
            }
        };

        Ok(EngineConfig {
            rate_table,
            vip_thresholds,
        })
    }

    async fn save_rate_table(&self, table: &RateTable) -> Result<(), StoreError> {
        let value = serde_json::to_value(table)
            .map_err(|e| StoreError::serialization(e.to_string()))?;
        self.upsert_value(RATE_TABLE_KEY, value).await
    }

    async fn save_vip_thresholds(&self, thresholds: &VipThresholds) -> Result<(), StoreError> {
        let value = serde_json::to_value(thresholds)
            .map_err(|e| StoreError::serialization(e.to_string()))?;
        self.upsert_value(VIP_THRESHOLDS_KEY, value).await
    }
}
