use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{handlers::{json_body, path_id, ListParams}, state::AppState},
    domain::{CreateReviewRequest, Review, UpdateReviewRequest},
    error::{AppError, Result},
};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Review>>> {
    let reviews = state.service_context.review_repo
        .list(params.limit(), params.offset())
        .await?;

    Ok(Json(reviews))
}

pub async fn get(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Review>> {
    let id = path_id(id)?;
    let review = state.service_context.review_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    Ok(Json(review))
}

pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>)> {
    let request = json_body(payload)?;
    request.validate()?;

    state.service_context.listing_repo
        .find_by_id(request.listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    let review = state.service_context.review_repo
        .create(request)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateReviewRequest>, JsonRejection>,
) -> Result<Json<Review>> {
    let id = path_id(id)?;
    let update = json_body(payload)?;
    update.validate()?;

    let review = state.service_context.review_repo
        .update(id, update)
        .await?;

    Ok(Json(review))
}

pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(id)?;
    state.service_context.review_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
