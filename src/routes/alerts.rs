//! Alert endpoints.
//!
//! Alerts are produced by a rules engine outside this service and appended
//! here; the mobile client reads back the latest few per device for its
//! notification feed.

use axum::{
    extract::Query,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{non_empty, AlertPayload, ApiError, SensorStore, UserStore};

// ---

pub fn router() -> Router<(SensorStore, UserStore)> {
    // ---
    Router::new().route("/api/alerts", post(create_alert).get(recent_alerts))
}

/// Handle `POST /api/alerts`: append one alert row.
async fn create_alert(
    State((_, users)): State<(SensorStore, UserStore)>,
    Json(payload): Json<AlertPayload>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let alert = payload.validate().ok_or(ApiError::MissingFields)?;

    users.insert_alert(&alert).await?;
    info!(
        "POST /api/alerts - stored alert for device '{}'",
        alert.device_id
    );

    Ok(Json(json!({
        "success": true,
        "message": "Alert inserted successfully.",
    })))
}

/// Query parameters for the alert feed.
#[derive(Debug, Deserialize)]
struct AlertsQuery {
    device_id: Option<String>,
}

/// Handle `GET /api/alerts`: up to the ten newest alerts for the device,
/// newest first.
async fn recent_alerts(
    Query(params): Query<AlertsQuery>,
    State((_, users)): State<(SensorStore, UserStore)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let device_id = non_empty(params.device_id).ok_or(ApiError::MissingFields)?;

    let alerts = users.recent_alerts(&device_id).await?;

    Ok(Json(json!({
        "success": true,
        "alerts": alerts,
    })))
}
