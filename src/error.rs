//! HTTP-facing error type for the AgriSense backend.
//!
//! Two failure classes cover every route:
//! - a required field missing from the request (rejected before any query),
//! - a database failure (logged in full server-side, reported generically).
//!
//! A lookup that matches nothing is NOT an error here: those routes answer
//! HTTP 200 with a `success:false` body, which existing clients rely on.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

// ---

/// Failure of a single request. Converting into a response produces the
/// exact envelopes the mobile and web clients parse.
#[derive(Debug)]
pub enum ApiError {
    // ---
    /// One or more required fields were absent (or empty, on the routes
    /// that reject empty strings). No query was attempted.
    MissingFields,

    /// The database rejected or failed the query. The detail is logged and
    /// never sent to the client.
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        match self {
            ApiError::MissingFields => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Missing one or more required fields.",
                })),
            )
                .into_response(),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Internal server error.",
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        // ---
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_fields_is_a_structured_400() {
        // ---
        let response = ApiError::MissingFields.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["error"], "Missing one or more required fields.");
    }

    #[tokio::test]
    async fn database_failure_is_a_generic_500() {
        // ---
        let response = ApiError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        // The sqlx detail must never reach the client.
        assert_eq!(body["error"], "Internal server error.");
    }
}
