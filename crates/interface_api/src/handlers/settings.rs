//! Settings administration handlers
//!
//! Reads and validated writes of the rate tier table and VIP thresholds.
//! Malformed tables are rejected here, at write time, with a validation
//! error; they never reach the settings store. A threshold write triggers
//! a full VIP recomputation pass over all users.

use std::time::Instant;

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use domain_investment::RateTable;
use domain_wallet::VipThresholds;
use engine_processing::VipRecalculator;

use crate::dto::{
    JobResponse, RateTiersResponse, UpdateRateTiersRequest, UpdateVipThresholdsRequest,
    VipThresholdsResponse, VipThresholdsUpdatedResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Returns the active rate tier table
pub async fn get_rate_tiers(
    State(state): State<AppState>,
) -> Result<Json<RateTiersResponse>, ApiError> {
    let config = state.settings.load().await?;
    Ok(Json(RateTiersResponse {
        tiers: config.rate_table.tiers().to_vec(),
    }))
}

/// Replaces the rate tier table
pub async fn put_rate_tiers(
    State(state): State<AppState>,
    Json(request): Json<UpdateRateTiersRequest>,
) -> Result<Json<RateTiersResponse>, ApiError> {
    request.validate()?;

    let table =
        RateTable::new(request.tiers).map_err(|e| ApiError::Validation(e.to_string()))?;
    state.settings.save_rate_table(&table).await?;

    info!(tiers = table.tiers().len(), "rate tier table updated");
    Ok(Json(RateTiersResponse {
        tiers: table.tiers().to_vec(),
    }))
}

/// Returns the active VIP thresholds
pub async fn get_vip_thresholds(
    State(state): State<AppState>,
) -> Result<Json<VipThresholdsResponse>, ApiError> {
    let config = state.settings.load().await?;
    Ok(Json(VipThresholdsResponse {
        max_tier: config.vip_thresholds.max_tier(),
        thresholds: config.vip_thresholds.thresholds().to_vec(),
    }))
}

/// Replaces the VIP thresholds and recomputes every user's tier
pub async fn put_vip_thresholds(
    State(state): State<AppState>,
    Json(request): Json<UpdateVipThresholdsRequest>,
) -> Result<Json<VipThresholdsUpdatedResponse>, ApiError> {
    request.validate()?;

    let thresholds = VipThresholds::new(request.thresholds)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    state.settings.save_vip_thresholds(&thresholds).await?;

    info!(
        thresholds = thresholds.thresholds().len(),
        "vip thresholds updated, recomputing all users"
    );

    let started = Instant::now();
    let summary = VipRecalculator::new(state.wallets.clone())
        .recompute_all(&thresholds)
        .await;

    Ok(Json(VipThresholdsUpdatedResponse {
        max_tier: thresholds.max_tier(),
        thresholds: thresholds.thresholds().to_vec(),
        recompute: JobResponse::vip(summary, started.elapsed()),
    }))
}
