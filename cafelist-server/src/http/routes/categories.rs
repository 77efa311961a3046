//! Category endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::db::repos::{Category, CategoryRepo};
use crate::http::error::ApiError;
use crate::state::AppState;

/// Category response
#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// GET /categories - list the canonical category table
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/categories", get(list_categories))
}
