use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{handlers::{json_body, path_id, ListParams}, state::AppState},
    domain::{CreateListingRequest, Listing, UpdateListingRequest},
    error::{AppError, Result},
};

fn check_price(price: Option<Decimal>) -> Result<()> {
    match price {
        Some(p) if p < Decimal::ZERO => {
            Err(AppError::Validation("price_per_night must not be negative".to_string()))
        }
        _ => Ok(()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Listing>>> {
    let listings = state.service_context.listing_repo
        .list(params.limit(), params.offset())
        .await?;

    Ok(Json(listings))
}

pub async fn get(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Listing>> {
    let id = path_id(id)?;
    let listing = state.service_context.listing_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    Ok(Json(listing))
}

pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateListingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Listing>)> {
    let request = json_body(payload)?;
    request.validate()?;
    check_price(Some(request.price_per_night))?;

    let listing = state.service_context.listing_repo
        .create(request)
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateListingRequest>, JsonRejection>,
) -> Result<Json<Listing>> {
    let id = path_id(id)?;
    let update = json_body(payload)?;
    update.validate()?;
    check_price(update.price_per_night)?;

    let listing = state.service_context.listing_repo
        .update(id, update)
        .await?;

    Ok(Json(listing))
}

pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(id)?;
    state.service_context.listing_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
