//! Integration tests driving the full axum router against a seeded store.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use warehouse_rates::config::{ApiKeyConfig, Config, DatabaseConfig, Role};
use warehouse_rates::handlers::quote::AppState;
use warehouse_rates::server::create_router;
use warehouse_rates::store::{seed, Store};

const ADMIN_KEY: &str = "wr-admin-integration";
const SUPPORT_KEY: &str = "wr-support-integration";

struct TestApp {
    app: Router,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_file(&self.db_path).ok();
    }
}

fn test_config(db_url: &str) -> Config {
    Config {
        server: Default::default(),
        database: DatabaseConfig {
            url: db_url.to_string(),
        },
        api_keys: vec![
            ApiKeyConfig {
                key: ADMIN_KEY.to_string(),
                name: "admin".to_string(),
                role: Role::Admin,
                enabled: true,
            },
            ApiKeyConfig {
                key: SUPPORT_KEY.to_string(),
                name: "support-desk".to_string(),
                role: Role::Supporter,
                enabled: true,
            },
            ApiKeyConfig {
                key: "wr-disabled".to_string(),
                name: "old-integration".to_string(),
                role: Role::Admin,
                enabled: false,
            },
        ],
        metrics: Default::default(),
    }
}

async fn insert_occupant(
    store: &Store,
    name: &str,
    area: f64,
    floor_type: Option<&str>,
    tenure: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO occupants (id, name, area_occupied, floor_type, tenure) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(name)
    .bind(area)
    .bind(floor_type)
    .bind(tenure)
    .execute(store.pool())
    .await
    .unwrap();
}

/// Build a router over a freshly seeded database with three occupants
async fn spawn_app() -> TestApp {
    let db_path = std::env::temp_dir().join(format!("wr-api-{}.db", uuid::Uuid::new_v4()));
    let db_url = format!("sqlite://{}", db_path.display());

    let store = Store::connect(&db_url).await.unwrap();
    seed::apply(&store).await.unwrap();

    insert_occupant(&store, "Gulf Trading Co", 120.0, Some("ground"), Some("short")).await;
    insert_occupant(&store, "Delmon Fixtures", 45.0, Some("mezzanine"), Some("long")).await;
    insert_occupant(&store, "Awali Archives", 0.0, None, None).await;

    let config_swap = Arc::new(ArcSwap::from_pointee(test_config(&db_url)));
    let app_state = AppState {
        config: config_swap.clone(),
        store,
    };

    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let metrics_handle = Arc::new(recorder.handle());

    TestApp {
        app: create_router(config_swap, app_state, metrics_handle),
        db_path,
    }
}

fn get(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = key {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, key: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let harness = spawn_app().await;

    let response = harness.app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness.app.clone().oneshot(get("/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn quote_requires_authentication() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .clone()
        .oneshot(post_json("/v1/quote", None, json!({"area": 100.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = harness
        .app
        .clone()
        .oneshot(post_json(
            "/v1/quote",
            Some("wr-disabled"),
            json!({"area": 100.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn quote_prices_from_seeded_table() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .clone()
        .oneshot(post_json(
            "/v1/quote",
            Some(SUPPORT_KEY),
            json!({"area": 100.0, "floor_type": "ground", "tenure": "short"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // Seed: Ground Floor 100-249 Short is 3.250/sqm
    assert_eq!(body["hasWarehouse"], json!(true));
    assert_eq!(body["chargeableArea"], json!(100.0));
    assert_eq!(body["ratePerSqm"], json!(3.25));
    assert_eq!(body["monthlyCost"], json!(325.0));
    assert_eq!(body["annualCost"], json!(3900.0));
    assert_eq!(body["ewaMonthly"], json!(15.0));
    assert_eq!(body["totalMonthly"], json!(340.0));
    assert!(body.get("error").is_none());
    assert_eq!(body["pricingDetails"]["areaBand"], json!("100-249 sqm"));
    assert_eq!(body["pricingDetails"]["tenure"], json!("Short"));
}

#[tokio::test]
async fn quote_rejects_non_positive_area() {
    let harness = spawn_app().await;

    for area in [0.0, -10.0] {
        let response = harness
            .app
            .clone()
            .oneshot(post_json(
                "/v1/quote",
                Some(SUPPORT_KEY),
                json!({"area": area}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn rates_listing_is_admin_only() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .clone()
        .oneshot(get("/v1/rates", Some(SUPPORT_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = harness
        .app
        .clone()
        .oneshot(get("/v1/rates", Some(ADMIN_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], json!(seed::seed_rates().len()));
}

#[tokio::test]
async fn occupant_cost_report_aggregates_portfolio() {
    let harness = spawn_app().await;

    // Supporter keys must not see the admin report
    let response = harness
        .app
        .clone()
        .oneshot(get("/v1/reports/occupant-costs", Some(SUPPORT_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = harness
        .app
        .clone()
        .oneshot(get("/v1/reports/occupant-costs", Some(ADMIN_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["occupants"].as_array().unwrap().len(), 3);

    // Gulf Trading: 120 sqm ground/short -> 120 * 3.250 + 15 EWA = 405
    // Delmon: 45 sqm mezzanine/long -> 45 * 2.400 + 15 EWA = 123
    // Awali: zero area, excluded from the summary
    let summary = &body["revenueSummary"];
    assert_eq!(summary["activeOccupants"], json!(2));
    assert_eq!(summary["totalMonthlyRevenue"], json!(528.0));
    assert_eq!(summary["totalAnnualRevenue"], json!(6336.0));
    assert_eq!(summary["averageMonthlyCost"], json!(264.0));
    assert_eq!(summary["totalAreaOccupied"], json!(165.0));

    let zero_area_row = body["occupants"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["name"] == json!("Awali Archives"))
        .unwrap();
    assert_eq!(zero_area_row["cost"]["hasWarehouse"], json!(false));
    assert_eq!(zero_area_row["cost"]["totalMonthly"], json!(0.0));
}

#[tokio::test]
async fn user_cost_report_is_visible_to_supporters() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .clone()
        .oneshot(get("/v1/reports/user-costs", Some(SUPPORT_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);

    let gulf = users
        .iter()
        .find(|u| u["name"] == json!("Gulf Trading Co"))
        .unwrap();
    assert_eq!(gulf["hasWarehouse"], json!(true));
    assert_eq!(gulf["totalMonthly"], json!(405.0));
    // No rate breakdown in the support view
    assert!(gulf.get("pricingDetails").is_none());

    assert_eq!(body["revenueSummary"]["activeOccupants"], json!(2));
}
