//! HTTP API module.
//!
//! JSON routes under `/api` plus the server-rendered gallery pages.
//!
//! Every JSON body carries `generation`, the catalog load counter at the time
//! the request was answered. It is 0 until the first successful load and goes
//! up by one with each successful load or reload. Clients that see it change
//! should refetch facets and badges; ids and facet values from an older
//! generation may no longer exist.

mod badges;
mod catalog;
mod gallery;
mod views;

pub use badges::*;
pub use catalog::*;
pub use gallery::*;
pub use views::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::catalog::LoadedCatalog;
use crate::errors::ApiError;
use crate::AppState;

/// Success envelope: `{ success: true, data, generation }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub generation: u64,
}

impl<T: Serialize> ApiResponse<T> {
    /// Answer with `data` as of catalog `generation`.
    pub fn at(generation: u64, data: T) -> Self {
        Self {
            success: true,
            data,
            generation,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// The loaded collection, or the 503/502 explaining why there is none.
async fn loaded_catalog(state: &AppState) -> Result<Arc<LoadedCatalog>, ApiError> {
    match state.catalog.require().await {
        Ok(loaded) => Ok(loaded),
        Err(e) => Err(e.at(state.catalog.generation().await)),
    }
}
