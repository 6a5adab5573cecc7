use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::api::utils::authenticate_request;
use crate::models::{Amenity, AmenityInput, MessageResponse};

pub async fn list_amenities_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Amenity>>> {
    Ok(Json(state.facade.list_amenities().await?))
}

#[tracing::instrument(skip(state))]
pub async fn get_amenity_handler(
    Path(amenity_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Amenity>> {
    Ok(Json(state.facade.get_amenity(&amenity_id).await?))
}

#[tracing::instrument(skip(state, headers, payload), fields(name = %payload.name))]
pub async fn create_amenity_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AmenityInput>,
) -> ApiResult<(StatusCode, Json<Amenity>)> {
    info!("Processing amenity creation");

    let actor = authenticate_request(&state, &headers).await?;
    let amenity = state.facade.create_amenity(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(amenity)))
}

#[tracing::instrument(skip(state, headers, payload))]
pub async fn update_amenity_handler(
    Path(amenity_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AmenityInput>,
) -> ApiResult<Json<Amenity>> {
    let actor = authenticate_request(&state, &headers).await?;
    Ok(Json(
        state
            .facade
            .update_amenity(&actor, &amenity_id, payload)
            .await?,
    ))
}

#[tracing::instrument(skip(state, headers))]
pub async fn delete_amenity_handler(
    Path(amenity_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    let actor = authenticate_request(&state, &headers).await?;
    state.facade.delete_amenity(&actor, &amenity_id).await?;
    Ok(Json(MessageResponse::new("Amenity deleted successfully")))
}
