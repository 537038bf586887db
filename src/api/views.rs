//! Catalog view endpoints.
//!
//! Mutations are triggers: they update the view's input immediately and the
//! visible badges after the debounce window.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::models::{BadgeCard, FacetField};
use crate::view::{CatalogView, ViewSnapshot};
use crate::AppState;

/// Request body for a search text change.
#[derive(Debug, Deserialize)]
pub struct SearchChange {
    #[serde(default)]
    pub value: String,
}

/// Request body for a facet selection change.
#[derive(Debug, Deserialize)]
pub struct FacetChange {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

async fn find_view(state: &AppState, id: &str) -> Result<Arc<CatalogView>, AppError> {
    let uuid =
        Uuid::parse_str(id).map_err(|_| AppError::BadRequest(format!("Invalid view id {}", id)))?;
    state
        .views
        .get(&uuid)
        .await
        .ok_or_else(|| AppError::NotFound(format!("View {} not found", id)))
}

/// POST /api/views - Open a new view.
pub async fn create_view(State(state): State<AppState>) -> ApiResult<ViewSnapshot> {
    let generation = state.catalog.generation().await;
    let view = state.views.open().await;
    Ok(ApiResponse::at(generation, view.snapshot().await))
}

/// GET /api/views/:id - Current state of a view.
pub async fn get_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ViewSnapshot> {
    let generation = state.catalog.generation().await;
    let view = find_view(&state, &id).await.map_err(|e| e.at(generation))?;
    Ok(ApiResponse::at(generation, view.snapshot().await))
}

/// PUT /api/views/:id/search - Search text changed.
pub async fn update_view_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SearchChange>,
) -> ApiResult<ViewSnapshot> {
    let generation = state.catalog.generation().await;
    let view = find_view(&state, &id).await.map_err(|e| e.at(generation))?;

    view.set_search(request.value).await;
    Ok(ApiResponse::at(generation, view.snapshot().await))
}

/// PUT /api/views/:id/filter - Facet selection changed.
pub async fn update_view_filter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<FacetChange>,
) -> ApiResult<ViewSnapshot> {
    let generation = state.catalog.generation().await;

    let field = FacetField::from_str(&request.field).ok_or_else(|| {
        AppError::Validation(format!(
            "Unknown facet {} (expected cost, level or type_category)",
            request.field
        ))
        .at(generation)
    })?;
    let view = find_view(&state, &id).await.map_err(|e| e.at(generation))?;

    view.set_facet(field, request.value).await;
    Ok(ApiResponse::at(generation, view.snapshot().await))
}

/// GET /api/views/:id/cards - Card view models for the visible badges.
pub async fn get_view_cards(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<BadgeCard>> {
    let generation = state.catalog.generation().await;
    let view = find_view(&state, &id).await.map_err(|e| e.at(generation))?;
    Ok(ApiResponse::at(generation, view.cards().await))
}

/// DELETE /api/views/:id - Close a view and cancel its pending pass.
pub async fn delete_view(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let generation = state.catalog.generation().await;
    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest(format!("Invalid view id {}", id)).at(generation))?;

    if state.views.close(&uuid).await {
        Ok(ApiResponse::at(generation, ()))
    } else {
        Err(AppError::NotFound(format!("View {} not found", id)).at(generation))
    }
}
