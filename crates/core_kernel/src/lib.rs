//! Core Kernel - Foundational types and utilities for the investment engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money and rate types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Store abstractions shared by every persistence adapter

pub mod error;
pub mod identifiers;
pub mod money;
pub mod store;

pub use error::CoreError;
pub use identifiers::{InvestmentId, LedgerEntryId, UserId};
pub use money::{Money, MoneyError, Rate};
pub use store::{CasOutcome, StoreError};
