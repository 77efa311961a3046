//! Shared application state

use sqlx::SqlitePool;

use crate::auth::JwtKeys;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, secret_key: &str) -> Self {
        Self {
            pool,
            jwt: JwtKeys::from_secret(secret_key),
        }
    }
}
