//! Store abstractions shared by every persistence adapter
//!
//! Each domain defines its own store trait (its port); adapters implement
//! those traits against PostgreSQL in `infra_db` or in memory in
//! `test_utils`. This module provides the pieces every port shares: the
//! unified `StoreError` and the `CasOutcome` of a conditional update.
//!
//! The engine's processors assume at-least-once, possibly concurrent
//! invocation. They never hold an in-process lock across rows; the only
//! concurrency primitive available to them is the store's conditional
//! update. `CasOutcome` makes that primitive explicit so it ports to any
//! storage engine with atomic row updates.

use std::fmt;
use thiserror::Error;

/// Error type for store operations
///
/// Provides a unified error type that all store implementations must use,
/// ensuring consistent error handling across database and in-memory
/// adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred before the write was attempted
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored data could not be serialized or deserialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        StoreError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        StoreError::Serialization {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may
    /// succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Outcome of a compare-and-set style conditional update
///
/// A conditional update either applies (the guarded column still held the
/// value the caller read) or loses the race to a concurrent writer. Losing
/// is not an error: the other writer already covered the same work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The update applied; this caller owns the transition
    Applied,
    /// Another writer got there first; the row was left untouched
    Lost,
}

impl CasOutcome {
    /// Returns true if the update applied
    pub fn applied(&self) -> bool {
        matches!(self, CasOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_not_found() {
        let error = StoreError::not_found("Investment", "INV-123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Investment"));
        assert!(error.to_string().contains("INV-123"));
    }

    #[test]
    fn test_store_error_transient() {
        let connection = StoreError::connection("pool exhausted");
        assert!(connection.is_transient());

        let validation = StoreError::validation("overlapping tiers");
        assert!(!validation.is_transient());
    }

    #[test]
    fn test_cas_outcome() {
        assert!(CasOutcome::Applied.applied());
        assert!(!CasOutcome::Lost.applied());
    }
}
