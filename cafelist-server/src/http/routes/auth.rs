//! Auth endpoints: registration and JWT login

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::state::AppState;

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// User response (never includes the password hash)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            is_active: u.is_active,
            is_superuser: u.is_superuser,
            is_verified: u.is_verified,
        }
    }
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token response
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /auth/register - create a user account
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("password cannot be empty".into()));
    }

    let hashed = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;
    let user = UserRepo::new(&state.pool).create(email, &hashed).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/jwt/login - exchange credentials for a bearer token
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // One failure message for every branch, so responses don't reveal
    // which emails are registered
    const BAD_CREDENTIALS: ApiError = ApiError::Unauthorized("invalid credentials");

    let user = UserRepo::new(&state.pool)
        .find_by_email(req.email.trim())
        .await?
        .ok_or(BAD_CREDENTIALS)?;

    if !verify_password(&req.password, &user.hashed_password) {
        return Err(BAD_CREDENTIALS);
    }
    if !user.is_active {
        return Err(BAD_CREDENTIALS);
    }

    let access_token = state
        .jwt
        .issue(user.id)
        .map_err(|e| ApiError::Internal(format!("token issuance failed: {e}")))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/jwt/login", post(login))
}
