/// HTTP request handlers
use crate::domain::{Health, LaunchRecord, ResultEnvelope, StatisticsSummary};
use crate::errors::ApiError;
use crate::services::LaunchService;
use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub launch_service: Arc<LaunchService>,
}

/// Welcome document
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "SpaceX Launches API" }))
}

/// Health check handler; store trouble is reported, never raised
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = if state.launch_service.store_connected().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(Health {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

/// List launches with filters and pagination
pub async fn list_launches(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let envelope = state.launch_service.list(&params).await?;
    Ok(Json(envelope))
}

/// Get a single launch by flight number; an unusable key is simply not found
pub async fn get_launch(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<LaunchRecord>, ApiError> {
    let Path(flight_number) =
        path.map_err(|e| ApiError::NotFound(format!("launch not found: {}", e.body_text())))?;
    let key = match flight_number.trim().parse::<u64>() {
        Ok(n) if n >= 1 => n,
        _ => {
            return Err(ApiError::NotFound(format!(
                "launch {} not found",
                flight_number
            )))
        }
    };

    let launch = state.launch_service.get(key).await?;
    Ok(Json(launch))
}

/// Aggregate launch statistics
pub async fn launch_stats(
    State(state): State<AppState>,
) -> Result<Json<StatisticsSummary>, ApiError> {
    let summary = state.launch_service.stats().await?;
    Ok(Json(summary))
}
