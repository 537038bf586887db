//! In-memory badge catalog.
//!
//! Holds the loaded collection together with its derived facets. A loaded
//! collection is immutable; a reload swaps in a new snapshot.

mod filter;

pub use filter::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{Badge, CatalogInfo, FacetOptions, LoadStatus};
use crate::source::BadgeSource;

/// One successfully loaded badge collection.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub badges: Vec<Badge>,
    pub facets: FacetOptions,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedCatalog {
    pub fn new(badges: Vec<Badge>, generation: u64) -> Self {
        let facets = derive_facets(&badges);
        Self {
            badges,
            facets,
            generation,
            loaded_at: Utc::now(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }
}

/// Load state of the catalog.
#[derive(Debug, Clone)]
enum LoadState {
    Pending,
    Loaded(Arc<LoadedCatalog>),
    Failed(AppError),
}

#[derive(Debug)]
struct CatalogState {
    load: LoadState,
    generation: u64,
    last_error: Option<AppError>,
}

/// Catalog shared across handlers and views.
pub struct Catalog {
    source: BadgeSource,
    state: RwLock<CatalogState>,
}

impl Catalog {
    pub fn new(source: BadgeSource) -> Self {
        Self {
            source,
            state: RwLock::new(CatalogState {
                load: LoadState::Pending,
                generation: 0,
                last_error: None,
            }),
        }
    }

    /// Fetch the collection from the source and install it.
    ///
    /// A failed fetch leaves an earlier loaded collection in place.
    pub async fn load(&self) -> Result<Arc<LoadedCatalog>, AppError> {
        match self.source.fetch().await {
            Ok(badges) => {
                let loaded = self.install(badges).await;
                tracing::info!(
                    "Loaded {} badges (generation {}) from {}",
                    loaded.badges.len(),
                    loaded.generation,
                    self.source.url()
                );
                Ok(loaded)
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.last_error = Some(e.clone());
                if matches!(state.load, LoadState::Loaded(_)) {
                    tracing::warn!("Reload failed, keeping current badges: {}", e);
                } else {
                    tracing::error!("Failed to load badges from {}: {}", self.source.url(), e);
                    state.load = LoadState::Failed(e.clone());
                }
                Err(e)
            }
        }
    }

    /// Replace the collection with `badges`, re-deriving facets.
    pub async fn install(&self, badges: Vec<Badge>) -> Arc<LoadedCatalog> {
        let mut state = self.state.write().await;
        state.generation += 1;
        let loaded = Arc::new(LoadedCatalog::new(badges, state.generation));
        state.load = LoadState::Loaded(Arc::clone(&loaded));
        state.last_error = None;
        loaded
    }

    /// Current collection, if one has loaded.
    pub async fn snapshot(&self) -> Option<Arc<LoadedCatalog>> {
        match &self.state.read().await.load {
            LoadState::Loaded(loaded) => Some(Arc::clone(loaded)),
            _ => None,
        }
    }

    /// Current collection, or the error explaining why there is none.
    pub async fn require(&self) -> Result<Arc<LoadedCatalog>, AppError> {
        match &self.state.read().await.load {
            LoadState::Loaded(loaded) => Ok(Arc::clone(loaded)),
            LoadState::Pending => Err(AppError::NotLoaded(
                "Badges are still being fetched".to_string(),
            )),
            LoadState::Failed(e) => Err(e.clone()),
        }
    }

    pub async fn status(&self) -> LoadStatus {
        match self.state.read().await.load {
            LoadState::Pending => LoadStatus::Pending,
            LoadState::Loaded(_) => LoadStatus::Loaded,
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn info(&self) -> CatalogInfo {
        let state = self.state.read().await;
        let (status, loaded_at, total) = match &state.load {
            LoadState::Pending => (LoadStatus::Pending, None, 0),
            LoadState::Loaded(loaded) => (
                LoadStatus::Loaded,
                Some(loaded.loaded_at.to_rfc3339()),
                loaded.badges.len(),
            ),
            LoadState::Failed(_) => (LoadStatus::Failed, None, 0),
        };

        CatalogInfo {
            status,
            generation: state.generation,
            loaded_at,
            total,
            source_url: self.source.url().to_string(),
            last_error: state.last_error.as_ref().map(|e| e.to_string()),
        }
    }
}
