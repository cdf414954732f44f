//! Trigger handlers for the periodic processors
//!
//! Each handler is one stateless run: load the configuration, execute the
//! processor against the stores, and return the batch summary. The
//! external scheduler calls these on its own cadence; overlapping calls
//! are safe because the processors are idempotent.

use std::time::Instant;

use axum::{extract::State, Json};
use chrono::Utc;

use engine_processing::{
    AccrualProcessor, SettlementProcessor, StatusReconciler, VipRecalculator,
};

use crate::dto::JobResponse;
use crate::error::ApiError;
use crate::AppState;

/// Runs one accrual pass
pub async fn run_accrual(State(state): State<AppState>) -> Result<Json<JobResponse>, ApiError> {
    let started = Instant::now();

    let summary = AccrualProcessor::new(state.investments.clone())
        .run(Utc::now())
        .await;

    Ok(Json(JobResponse::accrual(summary, started.elapsed())))
}

/// Runs one maturity settlement pass
pub async fn run_settlement(State(state): State<AppState>) -> Result<Json<JobResponse>, ApiError> {
    let started = Instant::now();
    let config = state.settings.load().await?;

    let summary = SettlementProcessor::new(state.investments.clone(), state.wallets.clone())
        .run(Utc::now(), &config)
        .await;

    Ok(Json(JobResponse::settlement(summary, started.elapsed())))
}

/// Runs one status reconciliation pass
pub async fn run_reconcile(State(state): State<AppState>) -> Result<Json<JobResponse>, ApiError> {
    let started = Instant::now();
    let config = state.settings.load().await?;

    let summary = StatusReconciler::new(state.investments.clone(), state.wallets.clone())
        .run(Utc::now(), &config)
        .await;

    Ok(Json(JobResponse::reconcile(summary, started.elapsed())))
}

/// Runs one full VIP recomputation pass
pub async fn run_vip_recompute(
    State(state): State<AppState>,
) -> Result<Json<JobResponse>, ApiError> {
    let started = Instant::now();
    let config = state.settings.load().await?;

    let summary = VipRecalculator::new(state.wallets.clone())
        .recompute_all(&config.vip_thresholds)
        .await;

    Ok(Json(JobResponse::vip(summary, started.elapsed())))
}
