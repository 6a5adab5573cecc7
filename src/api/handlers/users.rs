use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::api::utils::authenticate_request;
use crate::models::{MessageResponse, NewUser, UserResponse, UserUpdate};

pub async fn list_users_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.facade.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn get_user_handler(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(state.facade.get_user(&user_id).await?.into()))
}

/// Admin-only account creation
#[tracing::instrument(skip(state, headers, payload), fields(email = %payload.email))]
pub async fn create_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    info!("Processing user creation");

    // 1. Authentication
    let actor = authenticate_request(&state, &headers).await?;

    // 2. Call the facade and return
    let user = state.facade.create_user(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[tracing::instrument(skip(state, headers, payload))]
pub async fn update_user_handler(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    info!("Processing user update");

    let actor = authenticate_request(&state, &headers).await?;
    let user = state.facade.update_user(&actor, &user_id, payload).await?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip(state, headers))]
pub async fn delete_user_handler(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    info!("Processing user deletion");

    let actor = authenticate_request(&state, &headers).await?;
    state.facade.delete_user(&actor, &user_id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
