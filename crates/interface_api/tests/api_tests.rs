//! HTTP surface tests
//!
//! Drive the router end to end over the in-memory store adapters:
//! scheduler authentication, trigger summaries, and the validated
//! settings surface.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::UserId;
use domain_wallet::WalletStore;
use interface_api::auth::{create_token, roles};
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{fixed_now, InvestmentBuilder, MemoryInvestmentStore, MemorySettingsStore, MemoryWalletStore};

const SCHEDULER_SECRET: &str = "test-scheduler-secret";
const JWT_SECRET: &str = "test-jwt-secret";

struct Harness {
    server: TestServer,
    investments: Arc<MemoryInvestmentStore>,
    wallets: Arc<MemoryWalletStore>,
}

fn harness(dev_mode: bool) -> Harness {
    let investments = Arc::new(MemoryInvestmentStore::new());
    let wallets = Arc::new(MemoryWalletStore::new());
    let settings = Arc::new(MemorySettingsStore::new());

    let config = ApiConfig {
        scheduler_secret: SCHEDULER_SECRET.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        dev_mode,
        ..ApiConfig::default()
    };

    let state = AppState {
        investments: investments.clone(),
        wallets: wallets.clone(),
        settings,
        config,
    };

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        investments,
        wallets,
    }
}

fn scheduler_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-scheduler-token"),
        HeaderValue::from_static(SCHEDULER_SECRET),
    )
}

fn admin_bearer() -> (HeaderName, HeaderValue) {
    let token = create_token("ops-1", vec![roles::ADMIN.to_string()], JWT_SECRET, 300).unwrap();
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let h = harness(false);

    let response = h.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = h.server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn triggers_reject_unauthenticated_calls() {
    let h = harness(false);

    for path in [
        "/jobs/accrual",
        "/jobs/settlement",
        "/jobs/reconcile",
        "/jobs/vip-recompute",
    ] {
        let response = h.server.post(path).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn triggers_accept_bearer_secret() {
    let h = harness(false);

    let response = h
        .server
        .post("/jobs/accrual")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {SCHEDULER_SECRET}")).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn triggers_accept_scheduler_header_on_get_and_post() {
    let h = harness(false);
    let (name, value) = scheduler_header();

    let response = h
        .server
        .get("/jobs/accrual")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = h.server.post("/jobs/accrual").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn dev_mode_skips_trigger_auth() {
    let h = harness(true);
    let response = h.server.post("/jobs/settlement").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn settlement_trigger_reports_the_batch_summary() {
    let h = harness(false);
    let owner = UserId::new();
    h.wallets.register_user(owner);
    h.investments.seed(
        InvestmentBuilder::new(fixed_now())
            .owner(owner)
            .matured_days_ago(3)
            .build(),
    );

    let (name, value) = scheduler_header();
    let response = h
        .server
        .post("/jobs/settlement")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["processed_count"], json!(1));
    assert_eq!(body["total_returned"], json!("1140000"));
    assert!(body["errors"].as_array().unwrap().is_empty());
    assert!(body["execution_time_ms"].is_number());
    assert!(body["timestamp"].is_string());

    // Idempotence over the wire: the second trigger finds nothing.
    let body: Value = h
        .server
        .post("/jobs/settlement")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(body["processed_count"], json!(0));
    assert_eq!(body["total_returned"], json!("0"));
}

#[tokio::test]
async fn accrual_trigger_reports_updated_rows() {
    let h = harness(false);
    h.investments.seed(
        InvestmentBuilder::new(fixed_now() - chrono::Duration::days(40))
            .term_days(60)
            .build(),
    );

    let (name, value) = scheduler_header();
    let body: Value = h
        .server
        .post("/jobs/accrual")
        .add_header(name, value)
        .await
        .json();

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["updated"], json!(1));
}

#[tokio::test]
async fn settings_require_admin_jwt() {
    let h = harness(false);

    let response = h.server.get("/settings/rate-tiers").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // A valid token without the admin role is forbidden.
    let token = create_token("viewer-1", vec!["viewer".to_string()], JWT_SECRET, 300).unwrap();
    let response = h
        .server
        .get("/settings/rate-tiers")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = admin_bearer();
    let response = h
        .server
        .get("/settings/rate-tiers")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tiers"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn rate_tier_writes_are_validated() {
    let h = harness(false);
    let (name, value) = admin_bearer();

    // Overlapping tiers are rejected at write time.
    let response = h
        .server
        .put("/settings/rate-tiers")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "tiers": [
                {"min_days": 1, "max_days": 10, "rate": "1.0"},
                {"min_days": 10, "max_days": 20, "rate": "2.0"}
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // A gap between bounded tiers is rejected too.
    let response = h
        .server
        .put("/settings/rate-tiers")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "tiers": [
                {"min_days": 1, "max_days": 10, "rate": "1.0"},
                {"min_days": 15, "max_days": 20, "rate": "2.0"}
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // A well-formed table is accepted and echoed back.
    let response = h
        .server
        .put("/settings/rate-tiers")
        .add_header(name, value)
        .json(&json!({
            "tiers": [
                {"min_days": 1, "max_days": 10, "rate": "1.5"},
                {"min_days": 11, "rate": "3.0"}
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tiers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn vip_threshold_write_triggers_full_recompute() {
    let h = harness(false);
    let user = UserId::new();
    h.wallets.register_user(user);

    // Seed 60M of completed deposits directly.
    let entry = domain_wallet::LedgerEntry::completed_deposit(
        user,
        core_kernel::Money::new(dec!(60_000_000)),
        "seeded deposit",
        fixed_now(),
    )
    .unwrap();
    h.wallets.append_entry(&entry).await.unwrap();

    let (name, value) = admin_bearer();

    // Non-increasing thresholds are rejected.
    let response = h
        .server
        .put("/settings/vip-thresholds")
        .add_header(name.clone(), value.clone())
        .json(&json!({"thresholds": ["150000000", "50000000"]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = h
        .server
        .put("/settings/vip-thresholds")
        .add_header(name, value)
        .json(&json!({"thresholds": ["50000000", "150000000"]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["max_tier"], json!(2));
    assert_eq!(body["recompute"]["updated"], json!(1));
    assert_eq!(h.wallets.vip_tier(user).await.unwrap(), 1);
}
