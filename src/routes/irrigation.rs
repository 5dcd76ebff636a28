//! Irrigation event endpoints.
//!
//! The irrigation controller logs one row per watering cycle: total water
//! plus what each of its five dispensers released. A dispenser that stayed
//! closed reports 0, which is data, not a missing field.

use axum::{
    extract::Query,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{non_empty, ApiError, IrrigationPayload, SensorStore, UserStore};

// ---

pub fn router() -> Router<(SensorStore, UserStore)> {
    // ---
    Router::new().route("/api/irrigation", post(log_event).get(recent_events))
}

/// Handle `POST /api/irrigation`: append one dispenser/water event. The
/// timestamp defaults to the arrival time when the controller omits it.
async fn log_event(
    State((_, users)): State<(SensorStore, UserStore)>,
    Json(payload): Json<IrrigationPayload>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let event = payload.validate().ok_or(ApiError::MissingFields)?;

    users.insert_irrigation(&event).await?;
    info!(
        "POST /api/irrigation - stored event for device '{}'",
        event.device_id
    );

    Ok(Json(json!({
        "success": true,
        "message": "Irrigation data inserted successfully.",
    })))
}

/// Query parameters for the event readback.
#[derive(Debug, Deserialize)]
struct IrrigationQuery {
    device_id: Option<String>,
}

/// Handle `GET /api/irrigation`: up to the thirty newest events for the
/// device, newest first.
async fn recent_events(
    Query(params): Query<IrrigationQuery>,
    State((_, users)): State<(SensorStore, UserStore)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let device_id = non_empty(params.device_id).ok_or(ApiError::MissingFields)?;

    let events = users.recent_irrigation(&device_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": events,
    })))
}
