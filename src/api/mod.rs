pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, patch, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Payment flow; both spellings of the collection path are accepted
        .route("/payments", post(handlers::payments::initiate))
        .route("/payments", get(handlers::payments::verify))
        .route("/payments/", post(handlers::payments::initiate))
        .route("/payments/", get(handlers::payments::verify))
        .route("/payments/:transaction_id", get(handlers::payments::get))

        // Resource collections
        .nest("/listings", listing_routes())
        .nest("/bookings", booking_routes())
        .nest("/reviews", review_routes())

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::listings::list))
        .route("/", post(handlers::listings::create))
        .route("/:id", get(handlers::listings::get))
        .route("/:id", put(handlers::listings::update))
        .route("/:id", patch(handlers::listings::update))
        .route("/:id", delete(handlers::listings::delete))
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::bookings::list))
        .route("/", post(handlers::bookings::create))
        .route("/:id", get(handlers::bookings::get))
        .route("/:id", put(handlers::bookings::update))
        .route("/:id", patch(handlers::bookings::update))
        .route("/:id", delete(handlers::bookings::delete))
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::reviews::list))
        .route("/", post(handlers::reviews::create))
        .route("/:id", get(handlers::reviews::get))
        .route("/:id", put(handlers::reviews::update))
        .route("/:id", patch(handlers::reviews::update))
        .route("/:id", delete(handlers::reviews::delete))
}
