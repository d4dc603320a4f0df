use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The gateway answered with something that is not JSON.
    #[error("Gateway returned an unparsable response")]
    GatewayUnavailable(String),

    /// The gateway answered but did not report success.
    #[error("Gateway rejected the request")]
    GatewayRejected(serde_json::Value),

    #[error("External service error: {0}")]
    External(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Database error occurred" }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal server error" }))
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::GatewayUnavailable(raw) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid response from payment gateway",
                    "raw_response": raw,
                }),
            ),
            AppError::GatewayRejected(payload) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Payment initiation failed",
                    "chapa_response": payload,
                }),
            ),
            AppError::External(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("amount is required".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("Payment not found".into()), StatusCode::NOT_FOUND),
            (AppError::GatewayUnavailable("<html>".into()), StatusCode::BAD_REQUEST),
            (AppError::GatewayRejected(json!({"status": "failed"})), StatusCode::BAD_REQUEST),
            (AppError::Database("disk I/O error".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::External("timed out".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
