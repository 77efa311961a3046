//! Café endpoints: filtered listing, CRUD, recommendations
//!
//! Writes require an authenticated active user; reads are public.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use cafelist_core::{
    plan_associations, AssociationPlan, CafeDoc, CafeTitle, CityName, ImageUrl,
    recommend_similar,
};

use crate::db::repos::{CafeFilter, CafeRepo, CafeWithCategories, CategoryRepo, NewCafe};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::state::AppState;

/// Create/update request body
#[derive(Deserialize)]
pub struct CafeRequest {
    pub title: String,
    pub city: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub best_for: String,
    #[serde(default)]
    pub also_good_for: Vec<String>,
}

/// Café response with the derived category view
#[derive(Serialize)]
pub struct CafeResponse {
    pub id: i64,
    pub title: String,
    pub city: String,
    pub description: String,
    pub image_url: Option<String>,
    pub best_for: Option<String>,
    pub also_good_for: Vec<String>,
}

impl From<CafeWithCategories> for CafeResponse {
    fn from(c: CafeWithCategories) -> Self {
        Self {
            id: c.id,
            title: c.title,
            city: c.city,
            description: c.description,
            image_url: c.image_url,
            best_for: c.best_for,
            also_good_for: c.also_good_for,
        }
    }
}

/// List filter query parameters.
///
/// `also_good_for` takes a comma-separated list of category names.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub city: Option<String>,
    pub best_for: Option<String>,
    pub also_good_for: Option<String>,
}

impl From<ListParams> for CafeFilter {
    fn from(params: ListParams) -> Self {
        Self {
            city: params.city,
            best_for: params.best_for,
            also_good_for: params
                .also_good_for
                .map(|s| {
                    s.split(',')
                        .map(|n| n.trim().to_owned())
                        .filter(|n| !n.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Validate the request's scalar fields and resolve its category names
/// into an association plan.
async fn validate_request(
    state: &AppState,
    req: &CafeRequest,
) -> Result<(NewCafe, AssociationPlan), ApiError> {
    let cafe = NewCafe {
        title: CafeTitle::new(&req.title)?,
        city: CityName::new(&req.city)?,
        description: req.description.clone(),
        image_url: req
            .image_url
            .as_deref()
            .map(ImageUrl::new)
            .transpose()?,
    };

    let mut names: Vec<&str> = vec![&req.best_for];
    names.extend(req.also_good_for.iter().map(String::as_str));
    let known = CategoryRepo::new(&state.pool).resolve(&names).await?;
    let plan = plan_associations(&req.best_for, &req.also_good_for, &known)?;

    Ok((cafe, plan))
}

/// GET /cafes - list cafés, optionally filtered
async fn list_cafes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CafeResponse>>, ApiError> {
    let filter = CafeFilter::from(params);

    // Every named filter category must exist
    let names = filter.category_names();
    if !names.is_empty() {
        let known = CategoryRepo::new(&state.pool).resolve(&names).await?;
        let mut missing: Vec<&str> = names
            .iter()
            .filter(|n| !known.contains_key(**n))
            .copied()
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            missing.dedup();
            return Err(ApiError::Validation(format!(
                "categories do not exist: {}",
                missing.join(", ")
            )));
        }
    }

    let cafes = CafeRepo::new(&state.pool).list(&filter).await?;
    Ok(Json(cafes.into_iter().map(CafeResponse::from).collect()))
}

/// POST /cafes - create a café (auth required)
async fn create_cafe(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Json(req): Json<CafeRequest>,
) -> Result<(StatusCode, Json<CafeResponse>), ApiError> {
    let (cafe, plan) = validate_request(&state, &req).await?;
    let created = CafeRepo::new(&state.pool).create(&cafe, &plan).await?;
    Ok((StatusCode::CREATED, Json(CafeResponse::from(created))))
}

/// PUT /cafes/{id} - replace a café and its association set (auth required)
async fn update_cafe(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<CafeRequest>,
) -> Result<Json<CafeResponse>, ApiError> {
    let (cafe, plan) = validate_request(&state, &req).await?;
    let updated = CafeRepo::new(&state.pool).update(id, &cafe, &plan).await?;
    Ok(Json(CafeResponse::from(updated)))
}

/// DELETE /cafes/{id} - delete a café and its associations (auth required)
async fn delete_cafe(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    CafeRepo::new(&state.pool).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "Cafe deleted" })))
}

/// GET /cafes/{id}/recommend - top-3 most textually similar cafés
///
/// The corpus is re-vectorized on every call; nothing is cached.
async fn recommend_cafes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CafeResponse>>, ApiError> {
    let repo = CafeRepo::new(&state.pool);
    let all = repo.list(&CafeFilter::default()).await?;

    let docs: Vec<CafeDoc> = all
        .iter()
        .map(|c| CafeDoc::from_parts(c.id, &c.description, c.best_for.as_deref(), &c.also_good_for))
        .collect();
    let ranked = recommend_similar(id, &docs)?;

    let mut by_id: HashMap<i64, CafeWithCategories> =
        all.into_iter().map(|c| (c.id, c)).collect();
    Ok(Json(
        ranked
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .map(CafeResponse::from)
            .collect(),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cafes", get(list_cafes).post(create_cafe))
        .route(
            "/cafes/{id}",
            axum::routing::put(update_cafe).delete(delete_cafe),
        )
        .route("/cafes/{id}/recommend", get(recommend_cafes))
}
