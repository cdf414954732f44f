//! Periodic processing engine
//!
//! The processors here are stateless, re-entrant units of work invoked by
//! an external time-based trigger. They assume at-least-once, possibly
//! concurrent invocation: no in-process lock is shared across runs, and
//! all mutual exclusion happens through the stores' conditional updates.
//!
//! Each run loads its configuration once, processes a bounded batch,
//! isolates per-row failures, and returns a summary for the trigger
//! response. Rows that error (or lose a claim race) stay eligible for the
//! next invocation.

pub mod accrual;
pub mod config;
pub mod error;
pub mod reconciler;
pub mod settlement;
pub mod summary;
pub mod vip;

pub use accrual::AccrualProcessor;
pub use config::{EngineConfig, SettingsStore};
pub use error::{EngineError, ProcessingError, ProcessingErrorKind};
pub use reconciler::StatusReconciler;
pub use settlement::SettlementProcessor;
pub use summary::{AccrualSummary, ReconcileSummary, SettlementSummary, VipSummary};
pub use vip::VipRecalculator;

/// Default per-run batch bound; unprocessed rows wait for the next run
pub const DEFAULT_BATCH_SIZE: u32 = 500;
