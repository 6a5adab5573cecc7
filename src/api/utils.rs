//! Shared utility functions for API handlers

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::api::error::{ApiError, ApiResult};
use crate::api::server::AppState;
use crate::auth::extract_jwt_from_header;
use crate::db::Repository;
use crate::domain::Actor;

/// Resolve the bearer token to an actor.
///
/// The user is re-loaded so admin status reflects the store, not the token,
/// and tokens of deleted users stop working.
pub async fn authenticate_request(state: &AppState, headers: &HeaderMap) -> ApiResult<Actor> {
    let auth_header = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    let token = extract_jwt_from_header(auth_header)?;
    let claims = state.jwt.validate(token)?;

    let user = state
        .facade
        .repositories()
        .users
        .get(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Actor::new(user.id, user.is_admin))
}
