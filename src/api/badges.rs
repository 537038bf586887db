//! Badge listing endpoints.

use axum::extract::{Path, Query, State};
use serde::Serialize;

use super::{loaded_catalog, ApiResponse, ApiResult};
use crate::catalog::filter_badges;
use crate::errors::AppError;
use crate::models::{Badge, BadgeCard, FilterQuery, FilterState};
use crate::AppState;

/// Filtered badges with collection totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeListResponse {
    pub badges: Vec<Badge>,
    pub total: usize,
    pub matched: usize,
    pub filter: FilterState,
}

/// GET /api/badges - Badges matching the search text and facet selections.
pub async fn list_badges(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> ApiResult<BadgeListResponse> {
    let loaded = loaded_catalog(&state).await?;

    let filter = FilterState::from(params);
    let badges: Vec<Badge> = filter_badges(&loaded.badges, &filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(ApiResponse::at(
        loaded.generation,
        BadgeListResponse {
            matched: badges.len(),
            total: loaded.badges.len(),
            badges,
            filter,
        },
    ))
}

/// GET /api/badges/:id - Get a single badge.
pub async fn get_badge(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Badge> {
    let loaded = loaded_catalog(&state).await?;

    match loaded.get(&id) {
        Some(badge) => Ok(ApiResponse::at(loaded.generation, badge.clone())),
        None => Err(AppError::NotFound(format!("Badge {} not found", id)).at(loaded.generation)),
    }
}

/// GET /api/cards - Card view models for the matching badges.
pub async fn list_cards(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> ApiResult<Vec<BadgeCard>> {
    let loaded = loaded_catalog(&state).await?;

    let filter = FilterState::from(params);
    let cards = filter_badges(&loaded.badges, &filter)
        .into_iter()
        .map(BadgeCard::from)
        .collect();

    Ok(ApiResponse::at(loaded.generation, cards))
}
