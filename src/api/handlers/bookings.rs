use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    api::{handlers::{json_body, path_id, ListParams}, state::AppState},
    domain::{Booking, CreateBookingRequest, UpdateBookingRequest},
    error::{AppError, Result},
};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Booking>>> {
    let bookings = state.service_context.booking_repo
        .list(params.limit(), params.offset())
        .await?;

    Ok(Json(bookings))
}

pub async fn get(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>> {
    let id = path_id(id)?;
    let booking = state.service_context.booking_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>)> {
    let request = json_body(payload)?;

    if request.end_date < request.start_date {
        return Err(AppError::Validation("end_date must not be before start_date".to_string()));
    }
    if request.total_price < Decimal::ZERO {
        return Err(AppError::Validation("total_price must not be negative".to_string()));
    }

    state.service_context.listing_repo
        .find_by_id(request.listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    let booking = state.service_context.booking_repo
        .create(request)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> Result<Json<Booking>> {
    let id = path_id(id)?;
    let update = json_body(payload)?;

    if matches!(update.total_price, Some(p) if p < Decimal::ZERO) {
        return Err(AppError::Validation("total_price must not be negative".to_string()));
    }

    let booking = state.service_context.booking_repo
        .update(id, update)
        .await?;

    Ok(Json(booking))
}

pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(id)?;
    state.service_context.booking_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
