//! Investment domain - fixed-term, fixed-rate funded positions
//!
//! An investment freezes its principal, term, and daily profit rate at
//! creation. While active it accrues a running profit total; once its
//! maturity date passes it is settled exactly once, returning principal
//! plus the profit recomputed from the frozen inputs.

pub mod error;
pub mod investment;
pub mod rate;
pub mod store;

pub use error::{InvestmentError, RateTableError};
pub use investment::{Investment, InvestmentStatus};
pub use rate::{RateTable, RateTier, DEFAULT_DAILY_RATE_PERCENT};
pub use store::InvestmentStore;
