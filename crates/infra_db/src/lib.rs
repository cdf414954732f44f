//! Database infrastructure layer
//!
//! PostgreSQL adapters for the domain store ports. The conditional
//! updates the engine relies on (accrual compare-and-set, maturity claim)
//! are expressed as single atomic `UPDATE` statements here, so the
//! database is the arbiter under concurrent invocations.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::map_sqlx_error;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{PgInvestmentStore, PgSettingsStore, PgWalletStore};

/// Embedded schema migrations, applied at server startup
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
