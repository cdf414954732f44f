//! SQLx error mapping
//!
//! Translates SQLx errors into the unified `StoreError` the ports expose,
//! using PostgreSQL error codes to distinguish constraint violations from
//! transient connection trouble.

use core_kernel::StoreError;

/// Maps a SQLx error into a `StoreError`
///
/// `context` names the operation for the error message (e.g.
/// "claim matured investments").
pub fn map_sqlx_error(context: &str, error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::RowNotFound => StoreError::not_found("row", context),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Connection {
                message: format!("{context}: {error}"),
                source: Some(Box::new(error)),
            }
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL error codes
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") | Some("23514") => {
                    StoreError::conflict(format!("{context}: {}", db_err.message()))
                }
                _ => StoreError::Internal {
                    message: format!("{context}: {}", db_err.message()),
                    source: Some(Box::new(error)),
                },
            }
        }
        _ => StoreError::Internal {
            message: format!("{context}: {error}"),
            source: Some(Box::new(error)),
        },
    }
}
