//! Store adapters backed by PostgreSQL

pub mod investment;
pub mod settings;
pub mod wallet;

pub use investment::PgInvestmentStore;
pub use settings::PgSettingsStore;
pub use wallet::PgWalletStore;
