use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": "Staybook API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Property listings, bookings, reviews and payments",
        "base_url": state.settings.server.base_url,
        "endpoints": {
            "health": "/health",
            "listings": "/listings",
            "bookings": "/bookings",
            "reviews": "/reviews",
            "payments": "/payments/"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
