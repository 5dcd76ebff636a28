//! Sensor ingestion and readback endpoints.
//!
//! Field units POST their periodic measurements to `/api/receive-data`; the
//! dashboard pulls them back newest-first from `/api/readings`. Internal to
//! this file: the two handlers and the readback query parameters. Exported
//! to the gateway (`mod.rs`): a subrouter with both routes (EMBP).

use axum::{
    extract::Query,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{non_empty, ApiError, ReadingPayload, SensorStore, UserStore};

// ---

pub fn router() -> Router<(SensorStore, UserStore)> {
    // ---
    Router::new()
        .route("/api/receive-data", post(receive_data))
        .route("/api/readings", get(recent_readings))
}

/// Handle `POST /api/receive-data`.
///
/// All eight fields are required; zero values and empty strings are valid
/// sensor output and pass. One row is appended per accepted request.
async fn receive_data(
    State((sensors, _)): State<(SensorStore, UserStore)>,
    Json(payload): Json<ReadingPayload>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let reading = payload.validate().ok_or(ApiError::MissingFields)?;

    sensors.insert_reading(&reading).await?;
    info!(
        "POST /api/receive-data - stored reading from device '{}'",
        reading.device_id
    );

    Ok(Json(json!({
        "success": true,
        "message": "Data inserted successfully.",
    })))
}

/// Query parameters for `GET /api/readings`.
#[derive(Debug, Deserialize)]
struct ReadingsQuery {
    device_id: Option<String>,
}

/// Handle `GET /api/readings`.
///
/// Returns the most recent readings, newest first, capped by the store; an
/// absent or empty `device_id` parameter means no device filtering.
async fn recent_readings(
    Query(params): Query<ReadingsQuery>,
    State((sensors, _)): State<(SensorStore, UserStore)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let device_id = non_empty(params.device_id);
    debug!("GET /api/readings - device filter: {:?}", device_id);

    let rows = sensors.recent_readings(device_id.as_deref()).await?;
    debug!("GET /api/readings - returning {} rows", rows.len());

    Ok(Json(json!({
        "success": true,
        "data": rows,
    })))
}
