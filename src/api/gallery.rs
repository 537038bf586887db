//! Server-rendered gallery pages.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::filter_badges;
use crate::models::{BadgeCard, FacetField, FacetOptions, FilterQuery, FilterState};
use crate::render::{render_gallery, render_not_found, GalleryPage};
use crate::view::CatalogView;
use crate::AppState;

/// GET / - Gallery filtered directly by the query string.
pub async fn gallery(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Html<String> {
    let filter = FilterState::from(params);
    let status = state.catalog.status().await;

    let (facets, cards) = match state.catalog.snapshot().await {
        Some(loaded) => (
            loaded.facets.clone(),
            filter_badges(&loaded.badges, &filter)
                .into_iter()
                .map(BadgeCard::from)
                .collect(),
        ),
        None => (FacetOptions::default(), Vec::new()),
    };

    let page = GalleryPage {
        status,
        facets: &facets,
        filter: &filter,
        cards: &cards,
        action: "/",
        method: "get",
    };
    Html(render_gallery(&page).into_string())
}

/// Control values submitted from a view page. Absent controls are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct ViewControls {
    pub q: Option<String>,
    pub cost: Option<String>,
    pub level: Option<String>,
    pub type_category: Option<String>,
}

/// HTML 404 for a view that is not open.
fn missing_view(id: &str) -> (StatusCode, Html<String>) {
    let message = format!("View {} is not open. It may have been closed or expired.", id);
    (StatusCode::NOT_FOUND, Html(render_not_found(&message).into_string()))
}

async fn open_view(state: &AppState, id: &str) -> Result<Arc<CatalogView>, (StatusCode, Html<String>)> {
    let uuid = Uuid::parse_str(id).map_err(|_| missing_view(id))?;
    state.views.get(&uuid).await.ok_or_else(|| missing_view(id))
}

/// GET /views/:id - Gallery for a view, as of its last filtering pass.
pub async fn view_gallery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let view = open_view(&state, &id).await?;

    let snapshot = view.snapshot().await;
    let cards: Vec<BadgeCard> = snapshot.badges.iter().map(BadgeCard::from).collect();
    let action = format!("/views/{}", view.id());

    let page = GalleryPage {
        status: snapshot.status,
        facets: &snapshot.facets,
        filter: &snapshot.input,
        cards: &cards,
        action: &action,
        method: "post",
    };
    Ok(Html(render_gallery(&page).into_string()))
}

/// POST /views/:id - Feed changed controls to the view as triggers, then
/// redirect back to the page.
pub async fn submit_view_controls(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(controls): Form<ViewControls>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let view = open_view(&state, &id).await?;

    let current = view.snapshot().await.input;
    if let Some(q) = controls.q.filter(|q| *q != current.search) {
        view.set_search(q).await;
    }
    let submitted = [
        (FacetField::Cost, controls.cost),
        (FacetField::Level, controls.level),
        (FacetField::TypeCategory, controls.type_category),
    ];
    for (field, value) in submitted {
        if let Some(value) = value {
            if current.facet(field).unwrap_or_default() != value {
                view.set_facet(field, value).await;
            }
        }
    }

    Ok(Redirect::to(&format!("/views/{}", view.id())))
}
