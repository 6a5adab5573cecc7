use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::api::utils::authenticate_request;
use crate::models::{MessageResponse, Review, ReviewInput, ReviewUpdate};

pub async fn list_reviews_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.facade.list_reviews().await?))
}

#[tracing::instrument(skip(state))]
pub async fn get_review_handler(
    Path(review_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Review>> {
    Ok(Json(state.facade.get_review(&review_id).await?))
}

#[tracing::instrument(
    skip(state, headers, payload),
    fields(place_id = %payload.place_id, rating = payload.rating)
)]
pub async fn create_review_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReviewInput>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    info!("Processing review creation");

    let actor = authenticate_request(&state, &headers).await?;
    let review = state.facade.create_review(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[tracing::instrument(skip(state, headers, payload))]
pub async fn update_review_handler(
    Path(review_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReviewUpdate>,
) -> ApiResult<Json<Review>> {
    let actor = authenticate_request(&state, &headers).await?;
    Ok(Json(
        state
            .facade
            .update_review(&actor, &review_id, payload)
            .await?,
    ))
}

#[tracing::instrument(skip(state, headers))]
pub async fn delete_review_handler(
    Path(review_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    let actor = authenticate_request(&state, &headers).await?;
    state.facade.delete_review(&actor, &review_id).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
