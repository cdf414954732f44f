//! HTTP trigger layer
//!
//! This crate exposes the engine to its only consumers - schedulers and
//! administrators - using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one trigger per processor, plus settings and health
//! - **Middleware**: scheduler/admin authentication, audit logging
//! - **DTOs**: the scheduler-facing JSON summaries and admin requests
//! - **Error Handling**: consistent JSON error responses
//!
//! The state carries the store ports as trait objects, so the same router
//! runs against PostgreSQL in production and the in-memory adapters in
//! tests.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_investment::InvestmentStore;
use domain_wallet::WalletStore;
use engine_processing::SettingsStore;

use crate::config::ApiConfig;
use crate::handlers::{health, jobs, settings};
use crate::middleware::{admin_auth_middleware, audit_middleware, scheduler_auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub investments: Arc<dyn InvestmentStore>,
    pub wallets: Arc<dyn WalletStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// Trigger endpoints accept both GET and POST so any scheduler can call
/// them; they sit behind the scheduler credential. The settings surface
/// requires an admin JWT.
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Processor trigger routes
    let job_routes = Router::new()
        .route("/accrual", get(jobs::run_accrual).post(jobs::run_accrual))
        .route(
            "/settlement",
            get(jobs::run_settlement).post(jobs::run_settlement),
        )
        .route(
            "/reconcile",
            get(jobs::run_reconcile).post(jobs::run_reconcile),
        )
        .route(
            "/vip-recompute",
            get(jobs::run_vip_recompute).post(jobs::run_vip_recompute),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            scheduler_auth_middleware,
        ));

    // Settings administration routes
    let settings_routes = Router::new()
        .route(
            "/rate-tiers",
            get(settings::get_rate_tiers).put(settings::put_rate_tiers),
        )
        .route(
            "/vip-thresholds",
            get(settings::get_vip_thresholds).put(settings::put_vip_thresholds),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/jobs", job_routes)
        .nest("/settings", settings_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
