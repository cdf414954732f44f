//! Processing error types
//!
//! Per-item failures never abort a batch; they are collected into the run
//! summary. Partial-credit failures (a claimed investment whose wallet
//! credit or ledger write failed) are the most serious class and carry a
//! distinct kind so operators can find them.

use serde::Serialize;
use thiserror::Error;

use core_kernel::{InvestmentId, StoreError, UserId};
use domain_wallet::error::LedgerError;

/// Internal error type for a single settlement step
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Classification of a per-item processing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingErrorKind {
    /// A store operation failed before any state was claimed; the row
    /// retries on the next invocation
    Store,
    /// An investment was claimed but its wallet credit or ledger write
    /// failed; requires operator reconciliation
    PartialCredit,
}

/// A single failed item in a batch summary
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingError {
    pub kind: ProcessingErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_id: Option<InvestmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    pub message: String,
}

impl ProcessingError {
    /// A store failure while processing one investment
    pub fn store(investment_id: InvestmentId, error: &StoreError) -> Self {
        Self {
            kind: ProcessingErrorKind::Store,
            investment_id: Some(investment_id),
            owner_id: None,
            message: error.to_string(),
        }
    }

    /// A store failure not tied to a particular row (e.g. the batch
    /// selection query itself)
    pub fn batch(error: &StoreError) -> Self {
        Self {
            kind: ProcessingErrorKind::Store,
            investment_id: None,
            owner_id: None,
            message: error.to_string(),
        }
    }

    /// A store failure while recomputing one user
    pub fn user(owner_id: UserId, error: &StoreError) -> Self {
        Self {
            kind: ProcessingErrorKind::Store,
            investment_id: None,
            owner_id: Some(owner_id),
            message: error.to_string(),
        }
    }

    /// A claimed investment whose credit did not land
    pub fn partial_credit(
        investment_id: InvestmentId,
        owner_id: UserId,
        error: &EngineError,
    ) -> Self {
        Self {
            kind: ProcessingErrorKind::PartialCredit,
            investment_id: Some(investment_id),
            owner_id: Some(owner_id),
            message: error.to_string(),
        }
    }

    pub fn is_partial_credit(&self) -> bool {
        self.kind == ProcessingErrorKind::PartialCredit
    }
}
