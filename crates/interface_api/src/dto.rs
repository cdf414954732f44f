//! Request/Response data transfer objects

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_investment::RateTier;
use engine_processing::{
    AccrualSummary, ProcessingError, ReconcileSummary, SettlementSummary, VipSummary,
};

/// Scheduler-facing trigger response
///
/// `processed_count` is the batch size the run looked at; `total_returned`
/// (settlement) or `updated` (the other jobs) carries the job-specific
/// result figure.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub processed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_returned: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<u64>,
    pub errors: Vec<ProcessingError>,
    pub execution_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl JobResponse {
    fn base(success: bool, processed_count: usize, elapsed: Duration) -> Self {
        Self {
            success,
            processed_count,
            total_returned: None,
            updated: None,
            errors: Vec::new(),
            execution_time_ms: elapsed.as_millis() as u64,
            timestamp: Utc::now(),
        }
    }

    pub fn accrual(summary: AccrualSummary, elapsed: Duration) -> Self {
        let mut response = Self::base(summary.success(), summary.scanned, elapsed);
        response.updated = Some(summary.accrued as u64);
        response.errors = summary.errors;
        response
    }

    pub fn settlement(summary: SettlementSummary, elapsed: Duration) -> Self {
        let mut response = Self::base(summary.success(), summary.claimed, elapsed);
        response.total_returned = Some(summary.total_returned.amount());
        response.errors = summary.errors;
        response
    }

    pub fn reconcile(summary: ReconcileSummary, elapsed: Duration) -> Self {
        let corrected = summary.corrected();
        let mut response = Self::base(summary.success(), corrected as usize, elapsed);
        response.updated = Some(corrected);
        response.total_returned = Some(summary.settlement.total_returned.amount());
        let mut errors = summary.errors;
        errors.extend(summary.settlement.errors);
        response.errors = errors;
        response
    }

    pub fn vip(summary: VipSummary, elapsed: Duration) -> Self {
        let mut response = Self::base(summary.success(), summary.scanned, elapsed);
        response.updated = Some(summary.updated as u64);
        response.errors = summary.errors;
        response
    }
}

/// Admin write of the rate tier table
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRateTiersRequest {
    #[validate(length(min = 1, message = "at least one tier is required"))]
    pub tiers: Vec<RateTier>,
}

/// Admin write of the VIP thresholds
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVipThresholdsRequest {
    #[validate(length(min = 1, message = "at least one threshold is required"))]
    pub thresholds: Vec<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct RateTiersResponse {
    pub tiers: Vec<RateTier>,
}

#[derive(Debug, Serialize)]
pub struct VipThresholdsResponse {
    pub thresholds: Vec<Decimal>,
    pub max_tier: u32,
}

/// Response to a threshold write: the saved table plus the triggered
/// full recomputation pass
#[derive(Debug, Serialize)]
pub struct VipThresholdsUpdatedResponse {
    pub thresholds: Vec<Decimal>,
    pub max_tier: u32,
    pub recompute: JobResponse,
}
