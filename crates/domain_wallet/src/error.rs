//! Wallet domain error types

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by ledger entry construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger entry amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Ledger entry description must not be empty")]
    EmptyDescription,
}

/// Errors raised when validating a VIP threshold table
///
/// Configuration errors: they reject the table at write time and are never
/// raised during tier derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VipThresholdError {
    #[error("Threshold at position {index} must be positive, got {value}")]
    NonPositiveThreshold { index: usize, value: Decimal },

    #[error("Thresholds must be strictly increasing, violated at position {index}")]
    NotStrictlyIncreasing { index: usize },
}
