use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::models::{LoginRequest, NewUser, RegisterRequest, TokenResponse};

#[tracing::instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    info!("Processing registration");

    let user = state
        .facade
        .register_user(NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            is_admin: false,
        })
        .await?;

    let token = state.jwt.issue(&user)?;
    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(token))))
}

#[tracing::instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    info!("Processing login");

    let user = state
        .facade
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = state.jwt.issue(&user)?;
    Ok(Json(TokenResponse::bearer(token)))
}
