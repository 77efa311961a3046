//! Repository implementations for database access
//!
//! Patterns shared across repositories:
//! - transactions wrap every multi-step write
//! - unique-constraint violations surface as `DbError::Conflict`
//! - association lookups are batched per result set (no N+1)

pub mod cafes;
pub mod categories;
pub mod users;

use thiserror::Error;

pub use cafes::{CafeFilter, CafeRepo, CafeWithCategories, NewCafe};
pub use categories::{Category, CategoryRepo};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),
}

impl DbError {
    /// Translate a unique-constraint violation into a conflict, leaving
    /// other database errors untouched.
    pub(crate) fn from_unique(e: sqlx::Error, conflict_message: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(conflict_message.to_owned())
            }
            _ => Self::Sqlx(e),
        }
    }
}
