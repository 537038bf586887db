//! Interactive catalog views.
//!
//! A view owns one user's filter input and the badges currently visible to
//! them. Search and facet changes are triggers; filtering passes run through a
//! [`Debouncer`] so a burst of triggers costs a single pass.

mod debounce;
mod registry;

pub use debounce::Debouncer;
pub use registry::*;

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::catalog::{filter_indices, Catalog, LoadedCatalog};
use crate::models::{Badge, BadgeCard, FacetField, FacetOptions, FilterState, LoadStatus};

/// Which input a debounced filtering pass applies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputRead {
    /// The latest committed input at the moment the pass fires.
    #[default]
    Fresh,
    /// The input as it stood when the pass was scheduled, before the
    /// triggering change. The final pass of a burst lags one change behind.
    Stale,
}

impl InputRead {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputRead::Fresh => "fresh",
            InputRead::Stale => "stale",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fresh" => Some(InputRead::Fresh),
            "stale" => Some(InputRead::Stale),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct ViewState {
    /// What the controls show.
    input: FilterState,
    /// What the last filtering pass applied.
    applied: FilterState,
    collection: Option<Arc<LoadedCatalog>>,
    visible: Vec<usize>,
    passes: u64,
}

impl ViewState {
    fn apply(&mut self, filter: FilterState) {
        self.visible = match &self.collection {
            Some(loaded) => filter_indices(&loaded.badges, &filter),
            None => Vec::new(),
        };
        self.passes += 1;
        tracing::debug!(
            "Filtering pass {} applied {:?}: {} visible",
            self.passes,
            filter,
            self.visible.len()
        );
        self.applied = filter;
    }

    fn visible_badges(&self) -> Vec<Badge> {
        match &self.collection {
            Some(loaded) => self
                .visible
                .iter()
                .filter_map(|&i| loaded.badges.get(i).cloned())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Point-in-time state of a view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub id: Uuid,
    pub status: LoadStatus,
    pub input: FilterState,
    pub applied: FilterState,
    pub pending: bool,
    pub passes: u64,
    pub total: usize,
    pub facets: FacetOptions,
    pub badges: Vec<Badge>,
}

/// One user's view over the catalog.
pub struct CatalogView {
    id: Uuid,
    catalog: Arc<Catalog>,
    input_read: InputRead,
    state: Arc<Mutex<ViewState>>,
    debouncer: Debouncer,
    last_touched: std::sync::Mutex<Instant>,
}

impl CatalogView {
    pub fn new(catalog: Arc<Catalog>, window: Duration, input_read: InputRead) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            input_read,
            state: Arc::new(Mutex::new(ViewState::default())),
            debouncer: Debouncer::new(window),
            last_touched: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&self) {
        *self
            .last_touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time since the view was last read or changed.
    pub fn idle_for(&self) -> Duration {
        self.last_touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Search text changed.
    pub async fn set_search(&self, value: impl Into<String>) {
        let value = value.into();
        self.trigger(move |input| input.search = value).await;
    }

    /// A facet selection changed. The empty string clears it.
    pub async fn set_facet(&self, field: FacetField, value: impl Into<String>) {
        let value = value.into();
        self.trigger(move |input| input.set_facet(field, &value))
            .await;
    }

    /// Commit a change to the input and schedule a filtering pass.
    ///
    /// The pass is scheduled before the state lock is released, so passes are
    /// scheduled in the order their changes were committed.
    async fn trigger(&self, change: impl FnOnce(&mut FilterState)) {
        self.touch();
        let mut guard = self.state.lock().await;
        self.mount(&mut guard).await;
        let captured = guard.input.clone();
        change(&mut guard.input);

        let state = Arc::clone(&self.state);
        let input_read = self.input_read;
        self.debouncer.schedule(async move {
            let mut state = state.lock().await;
            let filter = match input_read {
                InputRead::Fresh => state.input.clone(),
                InputRead::Stale => captured,
            };
            state.apply(filter);
        });
    }

    /// Attach the loaded collection the first time one is available.
    async fn mount(&self, state: &mut ViewState) {
        if state.collection.is_some() {
            return;
        }
        if let Some(loaded) = self.catalog.snapshot().await {
            tracing::debug!(
                "View {} mounted generation {} ({} badges)",
                self.id,
                loaded.generation,
                loaded.badges.len()
            );
            state.visible = (0..loaded.badges.len()).collect();
            state.collection = Some(loaded);
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.touch();
        let mut state = self.state.lock().await;
        self.mount(&mut state).await;

        let status = match state.collection {
            Some(_) => LoadStatus::Loaded,
            None => self.catalog.status().await,
        };

        ViewSnapshot {
            id: self.id,
            status,
            input: state.input.clone(),
            applied: state.applied.clone(),
            pending: self.debouncer.is_pending(),
            passes: state.passes,
            total: state.collection.as_ref().map_or(0, |c| c.badges.len()),
            facets: state
                .collection
                .as_ref()
                .map(|c| c.facets.clone())
                .unwrap_or_default(),
            badges: state.visible_badges(),
        }
    }

    pub async fn cards(&self) -> Vec<BadgeCard> {
        self.snapshot()
            .await
            .badges
            .iter()
            .map(BadgeCard::from)
            .collect()
    }

    /// Cancel any pending pass. Returns true if one was still waiting.
    pub fn close(&self) -> bool {
        self.debouncer.cancel()
    }
}
