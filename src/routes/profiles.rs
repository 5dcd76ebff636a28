//! Profile and device-binding endpoints.
//!
//! The mobile client saves and reads user profiles here: one row per
//! (email, device) pair, saved with an update-or-insert, plus a bare
//! binding route that attaches a device to an email without clobbering any
//! details a previous save filled in. Lookups that match nothing answer
//! HTTP 200 with `success:false`; existing clients branch on that, not on
//! the status code.

use axum::{
    extract::Query,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    non_empty, AddDevicePayload, ApiError, ProfilePayload, ProfileSaveOutcome, SensorStore,
    UserStore,
};

// ---

pub fn router() -> Router<(SensorStore, UserStore)> {
    // ---
    Router::new()
        .route("/api/profile", post(save_profile))
        .route("/api/user-profile", get(profiles_for_email))
        .route("/api/user-profile-last", get(latest_profile))
        .route("/api/user-profile-by-device", get(profile_by_device))
        .route("/api/add-device", post(add_device))
}

/// Handle `POST /api/profile`.
///
/// All five fields are required and must be non-empty. The response message
/// tells the client whether the (email, device) row was updated in place or
/// created.
async fn save_profile(
    State((_, users)): State<(SensorStore, UserStore)>,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let profile = payload.validate().ok_or(ApiError::MissingFields)?;

    let outcome = users.save_profile(&profile).await?;
    info!(
        "POST /api/profile - {:?} profile for device '{}'",
        outcome, profile.device_id
    );

    let message = match outcome {
        ProfileSaveOutcome::Updated => "Profile updated successfully.",
        ProfileSaveOutcome::Created => "Profile created successfully.",
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
    })))
}

/// Query parameters for the by-email lookups.
#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

/// Handle `GET /api/user-profile`: every profile row for the email, most
/// recently saved first.
async fn profiles_for_email(
    Query(params): Query<EmailQuery>,
    State((_, users)): State<(SensorStore, UserStore)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let email = non_empty(params.email).ok_or(ApiError::MissingFields)?;

    let profiles = users.profiles_for_email(&email).await?;
    if profiles.is_empty() {
        return Ok(Json(json!({
            "success": false,
            "message": "No profile found for this email.",
        })));
    }

    Ok(Json(json!({
        "success": true,
        "profiles": profiles,
    })))
}

/// Handle `GET /api/user-profile-last`: the most recently saved row only.
async fn latest_profile(
    Query(params): Query<EmailQuery>,
    State((_, users)): State<(SensorStore, UserStore)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let email = non_empty(params.email).ok_or(ApiError::MissingFields)?;

    match users.latest_profile_for_email(&email).await? {
        Some(profile) => Ok(Json(json!({
            "success": true,
            "profile": profile,
        }))),
        None => Ok(Json(json!({
            "success": false,
            "message": "No profile found for this email.",
        }))),
    }
}

/// Query parameters for the composite lookup.
#[derive(Debug, Deserialize)]
struct ByDeviceQuery {
    email: Option<String>,
    device_id: Option<String>,
}

/// Handle `GET /api/user-profile-by-device`: exact (email, device) lookup.
/// The miss body is a bare `success:false`, without a message key.
async fn profile_by_device(
    Query(params): Query<ByDeviceQuery>,
    State((_, users)): State<(SensorStore, UserStore)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let email = non_empty(params.email).ok_or(ApiError::MissingFields)?;
    let device_id = non_empty(params.device_id).ok_or(ApiError::MissingFields)?;

    match users.find_profile(&email, &device_id).await? {
        Some(profile) => Ok(Json(json!({
            "success": true,
            "profile": profile,
        }))),
        None => Ok(Json(json!({ "success": false }))),
    }
}

/// Handle `POST /api/add-device`.
///
/// Idempotent: a repeat binding for the same (email, device) pair is a
/// silent no-op and reports success either way.
async fn add_device(
    State((_, users)): State<(SensorStore, UserStore)>,
    Json(payload): Json<AddDevicePayload>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let binding = payload.validate().ok_or(ApiError::MissingFields)?;

    users.bind_device(&binding).await?;
    info!(
        "POST /api/add-device - bound device '{}' to '{}'",
        binding.device_id, binding.email
    );

    Ok(Json(json!({
        "success": true,
        "message": "Device added successfully.",
    })))
}
