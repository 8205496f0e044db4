//! HTTP tests for the launch API, driven through the router in-process.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use launch_catalog::domain::{LaunchRecord, ResultEnvelope, StatisticsSummary};
use launch_catalog::errors::{ApiError, ApiResult};
use launch_catalog::handlers::AppState;
use launch_catalog::repo::{MemoryLaunchStore, RecordStore};
use launch_catalog::routes::build_router;
use launch_catalog::services::LaunchService;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

// =============================================================================
// Test Helpers
// =============================================================================

fn app_with_store(store: Arc<dyn RecordStore>) -> Router {
    let launch_service = Arc::new(LaunchService::new(store, Duration::from_millis(500)));
    build_router(AppState { launch_service })
}

fn app_with(items: Vec<Value>) -> Router {
    app_with_store(Arc::new(MemoryLaunchStore::from_items(items)))
}

fn sample_app() -> Router {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/launches.sample.json");
    app_with_store(Arc::new(
        MemoryLaunchStore::from_file(path).expect("sample data should load"),
    ))
}

/// flight_numbers {1,2,3} with outcomes {false, true, unknown}, stored out of order
fn three_launches() -> Vec<Value> {
    vec![
        json!({"flight_number": 2, "mission_name": "DemoSat", "rocket": {"rocket_id": "falcon1", "rocket_name": "Falcon 1", "rocket_type": "Merlin A"}, "launch_success": true}),
        json!({"flight_number": 3, "mission_name": "Trailblazer", "rocket": {"rocket_id": "falcon1", "rocket_name": "Falcon 1", "rocket_type": "Merlin C"}}),
        json!({"flight_number": 1, "mission_name": "FalconSat", "rocket": {"rocket_id": "falcon1", "rocket_name": "Falcon 1", "rocket_type": "Merlin A"}, "launch_success": false}),
    ]
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn fetch_all(&self) -> ApiResult<Vec<LaunchRecord>> {
        Err(ApiError::StoreUnavailable("connection refused".to_string()))
    }

    async fn fetch_by_key(&self, _flight_number: u64) -> ApiResult<LaunchRecord> {
        Err(ApiError::StoreUnavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> ApiResult<()> {
        Err(ApiError::StoreUnavailable("connection refused".to_string()))
    }
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_without_filters_returns_everything_in_order() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches").await;
    assert_eq!(status, StatusCode::OK);

    let envelope: ResultEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.total, 3);
    assert_eq!(envelope.limit, 50);
    assert_eq!(envelope.offset, 0);
    let order: Vec<u64> = envelope.data.iter().map(|r| r.flight_number).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_limit_one_offset_one() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches?limit=1&offset=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["flight_number"], 2);
}

#[tokio::test]
async fn test_list_success_filter_excludes_unknown_outcome() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches?launch_success=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["flight_number"], 2);

    let (_, failed) = get(app_with(three_launches()), "/api/v1/launches?launch_success=false").await;
    assert_eq!(failed["total"], 1);
    assert_eq!(failed["data"][0]["flight_number"], 1);
}

#[tokio::test]
async fn test_list_combined_filters() {
    let (status, body) = get(
        sample_app(),
        "/api/v1/launches?rocket_name=falcon%209&mission_name=STARLINK",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let flights: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["flight_number"].as_u64().unwrap())
        .collect();
    assert_eq!(flights, vec![99, 110]);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_list_date_range_filter() {
    let (status, body) = get(
        sample_app(),
        "/api/v1/launches?start_date=2007-01-01&end_date=2010-12-31",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let flights: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["flight_number"].as_u64().unwrap())
        .collect();
    assert_eq!(flights, vec![2, 4, 6]);
}

#[tokio::test]
async fn test_list_empty_filter_value_is_ignored() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches?mission_name=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_list_offset_beyond_total_is_empty() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches?offset=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_unknown_filter_is_bad_request() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches?launch_site=KSC").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "INVALID_FILTER");
}

#[tokio::test]
async fn test_list_negative_pagination_is_bad_request() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches?limit=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PAGINATION");
}

#[tokio::test]
async fn test_list_store_down_is_service_unavailable() {
    let (status, body) = get(app_with_store(Arc::new(UnreachableStore)), "/api/v1/launches").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
}

#[tokio::test]
async fn test_list_malformed_item_fails_whole_request() {
    let mut items = three_launches();
    items.push(json!({"mission_name": "missing key"}));
    let (status, body) = get(app_with(items), "/api/v1/launches").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
}

// =============================================================================
// Single launch
// =============================================================================

#[tokio::test]
async fn test_get_launch_wire_shape() {
    let (status, body) = get(sample_app(), "/api/v1/launches/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flight_number"], 1);
    assert_eq!(body["mission_name"], "FalconSat");
    assert_eq!(body["rocket"]["rocket_id"], "falcon1");
    assert_eq!(body["rocket"]["rocket_name"], "Falcon 1");
    assert_eq!(body["launch_success"], false);
    assert_eq!(body["launch_failure_details"]["time"], 33);
    assert_eq!(body["launch_failure_details"]["reason"], "merlin engine failure");
    assert_eq!(body["links"]["video_link"], "https://www.youtube.com/watch?v=0a_00nJ_Y88");

    let record: LaunchRecord = serde_json::from_value(body).unwrap();
    assert!(record.launch_date.is_some());
}

#[tokio::test]
async fn test_get_launch_unknown_outcome_is_null() {
    let (status, body) = get(sample_app(), "/api/v1/launches/110").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["launch_success"].is_null());
    assert!(body["launch_date"].is_null());
    assert!(body["launch_failure_details"].is_null());
}

#[tokio::test]
async fn test_get_launch_not_found() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = get(app_with(three_launches()), "/api/v1/launches/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_launch_undecodable_key_uses_error_envelope() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches/%FF").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_repeated_flight_number_is_service_unavailable() {
    let mut items = three_launches();
    items.push(json!({"flight_number": "1", "mission_name": "Shadow"}));

    let (status, body) = get(app_with(items.clone()), "/api/v1/launches").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");

    let (status, _) = get(app_with(items), "/api/v1/launches/1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_get_launch_store_down() {
    let (status, _) = get(app_with_store(Arc::new(UnreachableStore)), "/api/v1/launches/1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Statistics
// =============================================================================

#[tokio::test]
async fn test_stats_three_launches() {
    let (status, body) = get(app_with(three_launches()), "/api/v1/launches/stats").await;
    assert_eq!(status, StatusCode::OK);

    let summary: StatisticsSummary = serde_json::from_value(body).unwrap();
    assert_eq!(summary.total_launches, 3);
    assert_eq!(summary.successful_launches, 1);
    assert_eq!(summary.failed_launches, 1);
    assert_eq!(summary.success_rate, 33.3);
    assert_eq!(summary.most_used_rockets.len(), 1);
    assert_eq!(summary.most_used_rockets[0].name, "Falcon 1");
    assert_eq!(summary.most_used_rockets[0].count, 3);
}

#[tokio::test]
async fn test_stats_ignore_filters_in_query() {
    let (status, body) = get(sample_app(), "/api/v1/launches/stats?launch_success=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_launches"], 7);
    assert_eq!(body["most_used_rockets"][0]["name"], "Falcon 1");
    assert_eq!(body["most_used_rockets"][0]["count"], 3);
    assert_eq!(body["most_used_rockets"][1]["name"], "Falcon 9");
    assert_eq!(body["most_used_rockets"][1]["count"], 3);
}

#[tokio::test]
async fn test_stats_wrong_typed_rocket_name_is_service_unavailable() {
    let mut items = three_launches();
    items.push(json!({"flight_number": 4, "rocket": {"rocket_name": {"nested": "x"}}}));
    let (status, body) = get(app_with(items), "/api/v1/launches/stats").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
}

#[tokio::test]
async fn test_stats_empty_store() {
    let (status, body) = get(app_with(Vec::new()), "/api/v1/launches/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_launches"], 0);
    assert_eq!(body["success_rate"], 0.0);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_connected() {
    for uri in ["/health", "/api/v1/health"] {
        let (status, body) = get(app_with(three_launches()), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_health_store_down_still_ok() {
    let (status, body) = get(app_with_store(Arc::new(UnreachableStore)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_root_welcome() {
    let (status, body) = get(app_with(Vec::new()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

// =============================================================================
// Served over TCP
// =============================================================================

#[tokio::test]
async fn test_served_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let app = sample_app();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{}/api/v1/launches?limit=2&offset=2", addr))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .expect("Failed to send list request");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let envelope: ResultEnvelope = resp.json().await.expect("Failed to parse envelope");
    assert_eq!(envelope.total, 7);
    let flights: Vec<u64> = envelope.data.iter().map(|r| r.flight_number).collect();
    assert_eq!(flights, vec![4, 6]);
}
