//! Investment domain error types

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when validating a rate tier table
///
/// These are configuration errors: they reject the table at write time and
/// are never raised during rate resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("Tier min_days must be at least 1, got {0}")]
    MinDaysBelowOne(u32),

    #[error("Tier bounds inverted: min_days {min_days} > max_days {max_days}")]
    InvertedBounds { min_days: u32, max_days: u32 },

    #[error("Tier starting at day {min_days} has a negative rate ({rate}%)")]
    NegativeRate { min_days: u32, rate: Decimal },

    #[error("Open-ended tier starting at day {min_days} must be the last tier")]
    OpenEndedNotLast { min_days: u32 },

    #[error("Tiers overlap at day {day}")]
    Overlap { day: u32 },

    #[error("Uncovered gap between day {gap_start} and day {gap_end}")]
    Gap { gap_start: u32, gap_end: u32 },
}

/// Errors raised by the investment aggregate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvestmentError {
    #[error("Principal must be positive, got {0}")]
    NonPositivePrincipal(Decimal),

    #[error("Term must be at least 1 day, got {0}")]
    TermBelowOneDay(u32),

    #[error("Investment is already completed")]
    AlreadyCompleted,
}
