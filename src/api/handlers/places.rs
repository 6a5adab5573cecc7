use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::api::utils::authenticate_request;
use crate::models::{
    MessageResponse, Place, PlaceDetails, PlaceInput, PlaceSummary, PlaceUpdate, Review,
};

pub async fn list_places_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PlaceSummary>>> {
    Ok(Json(state.facade.list_places().await?))
}

#[tracing::instrument(skip(state))]
pub async fn get_place_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<PlaceDetails>> {
    Ok(Json(state.facade.get_place_details(&place_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn list_place_reviews_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.facade.list_place_reviews(&place_id).await?))
}

#[tracing::instrument(skip(state, headers, payload), fields(title = %payload.title))]
pub async fn create_place_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PlaceInput>,
) -> ApiResult<(StatusCode, Json<Place>)> {
    info!("Processing place creation");

    // 1. Authentication
    let actor = authenticate_request(&state, &headers).await?;

    // 2. Call the facade and return
    let place = state.facade.create_place(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

#[tracing::instrument(skip(state, headers, payload))]
pub async fn update_place_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PlaceUpdate>,
) -> ApiResult<Json<Place>> {
    info!("Processing place update");

    let actor = authenticate_request(&state, &headers).await?;
    Ok(Json(
        state.facade.update_place(&actor, &place_id, payload).await?,
    ))
}

#[tracing::instrument(skip(state, headers))]
pub async fn delete_place_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    let actor = authenticate_request(&state, &headers).await?;
    state.facade.delete_place(&actor, &place_id).await?;
    Ok(Json(MessageResponse::new("Place deleted successfully")))
}
