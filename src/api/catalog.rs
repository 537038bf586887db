//! Catalog status endpoints.

use axum::extract::State;

use super::{loaded_catalog, ApiResponse, ApiResult};
use crate::models::{CatalogInfo, FacetOptions};
use crate::AppState;

/// GET /api/catalog - Load status of the badge collection.
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<CatalogInfo> {
    let info = state.catalog.info().await;
    Ok(ApiResponse::at(info.generation, info))
}

/// POST /api/catalog/reload - Refetch the badge source.
pub async fn reload_catalog(State(state): State<AppState>) -> ApiResult<CatalogInfo> {
    match state.catalog.load().await {
        Ok(loaded) => Ok(ApiResponse::at(loaded.generation, state.catalog.info().await)),
        Err(e) => Err(e.at(state.catalog.generation().await)),
    }
}

/// GET /api/facets - Distinct values for each facet.
pub async fn get_facets(State(state): State<AppState>) -> ApiResult<FacetOptions> {
    let loaded = loaded_catalog(&state).await?;
    Ok(ApiResponse::at(loaded.generation, loaded.facets.clone()))
}
