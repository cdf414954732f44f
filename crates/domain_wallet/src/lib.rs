//! Wallet domain - ledger-backed balances and VIP tiers
//!
//! A user's wallet balance is a materialized cache of the append-only
//! ledger: completed deposits minus completed withdraws, plus
//! administrative adjustments. The VIP tier derives from cumulative
//! completed deposits through a configured threshold table.

pub mod error;
pub mod ledger;
pub mod store;
pub mod vip;
pub mod wallet;

pub use error::{LedgerError, VipThresholdError};
pub use ledger::{ledger_balance, EntryKind, EntryStatus, LedgerEntry};
pub use store::WalletStore;
pub use vip::VipThresholds;
pub use wallet::UserWallet;
