//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::db::repos::{User, UserRepo};
use crate::state::AppState;

/// Authenticated, active user. Rejects with 401 when the bearer token
/// is missing, invalid, expired, or belongs to an inactive user.
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("missing bearer token"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("missing bearer token"))?;

        let claims = state
            .jwt
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("invalid or expired token"))?;

        let user = UserRepo::new(&state.pool)
            .get(claims.sub)
            .await
            .map_err(|e| match e {
                crate::db::DbError::NotFound { .. } => {
                    ApiError::Unauthorized("invalid or expired token")
                }
                other => ApiError::Database(other),
            })?;

        if !user.is_active {
            return Err(ApiError::Unauthorized("user is inactive"));
        }

        Ok(Self(user))
    }
}
