//! Strongly-typed engine configuration
//!
//! The rate table and VIP thresholds live in a generic settings store as
//! serialized rows. Each processing run loads them once into an
//! `EngineConfig` and passes that value explicitly; nothing reads settings
//! as ambient global state. Absent rows fall back to the built-in
//! defaults, and malformed tables are rejected at write time by the
//! validated constructors of `RateTable` and `VipThresholds`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::StoreError;
use domain_investment::RateTable;
use domain_wallet::VipThresholds;

/// Settings key for the rate tier table
pub const RATE_TABLE_KEY: &str = "investment_rate_tiers";
/// Settings key for the VIP threshold list
pub const VIP_THRESHOLDS_KEY: &str = "vip_thresholds";

/// Configuration snapshot for one processing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub rate_table: RateTable,
    pub vip_thresholds: VipThresholds,
}

/// Port for the generic key/value settings rows
///
/// Implementations only ever see already-validated tables: the typed
/// constructors reject malformed configuration before a write reaches
/// the store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the engine configuration, falling back to defaults for
    /// absent rows
    async fn load(&self) -> Result<EngineConfig, StoreError>;

    /// Persists the rate tier table
    async fn save_rate_table(&self, table: &RateTable) -> Result<(), StoreError>;

    /// Persists the VIP threshold list
    async fn save_vip_thresholds(&self, thresholds: &VipThresholds) -> Result<(), StoreError>;
}
