use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use staybook::{
    api,
    config::Settings,
    payments::{FakeGateway, FakeOutcome},
    service::ServiceContext,
};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> anyhow::Result<Router> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway = Arc::new(FakeGateway::new(FakeOutcome::Success, FakeOutcome::Success));
    let context = Arc::new(ServiceContext::new(pool, gateway));
    Ok(api::create_app(context, Arc::new(Settings::default())))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn create_listing(app: &Router) -> anyhow::Result<String> {
    let (status, body) = call(app, "POST", "/listings", Some(json!({
        "name": "Bole Garden Apartment",
        "description": "Two bedrooms near the airport",
        "location": "Addis Ababa",
        "price_per_night": "3500.00",
        "host_id": Uuid::new_v4(),
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn test_listing_endpoints() -> anyhow::Result<()> {
    let app = app().await?;
    let id = create_listing(&app).await?;

    let (status, body) = call(&app, "GET", &format!("/listings/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_per_night"], "3500.00");

    let (status, body) = call(&app, "PATCH", &format!("/listings/{}", id), Some(json!({
        "price_per_night": "3200.00",
    }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_per_night"], "3200.00");

    let (status, body) = call(&app, "GET", "/listings?limit=5", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = call(&app, "DELETE", &format!("/listings/{}", id), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", &format!("/listings/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_listing_name_too_long() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, _) = call(&app, "POST", "/listings", Some(json!({
        "name": "x".repeat(256),
        "description": "",
        "location": "Harar",
        "price_per_night": "10",
        "host_id": Uuid::new_v4(),
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_booking_requires_existing_listing_and_ordered_dates() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, _) = call(&app, "POST", "/bookings", Some(json!({
        "listing_id": Uuid::new_v4(),
        "guest_id": Uuid::new_v4(),
        "start_date": "2026-11-01",
        "end_date": "2026-11-03",
        "total_price": "7000.00",
    }))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let listing_id = create_listing(&app).await?;

    let (status, _) = call(&app, "POST", "/bookings", Some(json!({
        "listing_id": listing_id,
        "guest_id": Uuid::new_v4(),
        "start_date": "2026-11-05",
        "end_date": "2026-11-03",
        "total_price": "7000.00",
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, "POST", "/bookings", Some(json!({
        "listing_id": listing_id,
        "guest_id": Uuid::new_v4(),
        "start_date": "2026-11-01",
        "end_date": "2026-11-03",
        "total_price": "7000.00",
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");

    let booking_id = body["id"].as_str().unwrap().to_string();
    let (status, body) = call(&app, "PUT", &format!("/bookings/{}", booking_id), Some(json!({
        "status": "cancelled",
    }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    Ok(())
}

#[tokio::test]
async fn test_review_rating_range() -> anyhow::Result<()> {
    let app = app().await?;
    let listing_id = create_listing(&app).await?;

    let (status, _) = call(&app, "POST", "/reviews", Some(json!({
        "listing_id": listing_id,
        "user_id": Uuid::new_v4(),
        "rating": 6,
        "comment": "Too good",
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, "POST", "/reviews", Some(json!({
        "listing_id": listing_id,
        "user_id": Uuid::new_v4(),
        "rating": 4,
        "comment": "Great host",
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 4);

    Ok(())
}

#[tokio::test]
async fn test_malformed_id_is_json_bad_request() -> anyhow::Result<()> {
    let app = app().await?;

    for uri in ["/listings/not-a-uuid", "/bookings/not-a-uuid", "/reviews/not-a-uuid"] {
        let (status, body) = call(&app, "GET", uri, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (status, body) = call(&app, "DELETE", "/listings/42", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_negative_limit_is_clamped() -> anyhow::Result<()> {
    let app = app().await?;
    create_listing(&app).await?;
    create_listing(&app).await?;

    let (status, body) = call(&app, "GET", "/listings?limit=-1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = call(&app, "GET", "/listings?offset=-3", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    Ok(())
}
