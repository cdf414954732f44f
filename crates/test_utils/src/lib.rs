//! Shared test utilities for the investment engine test suite
//!
//! The in-memory stores here are the mock adapters of the port
//! architecture: they implement the same store traits as the PostgreSQL
//! adapters, with genuine compare-and-set semantics, so the processors
//! can be exercised concurrently without a database.

pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod memory;

pub use builders::InvestmentBuilder;
pub use fixtures::{engine_config, fixed_now, product_rate_table, vip_thresholds};
pub use memory::{MemoryInvestmentStore, MemorySettingsStore, MemoryWalletStore};
