//! Registry of open catalog views.
//!
//! Views are dropped when closed, when they sit idle past the configured TTL,
//! or when the registry is full and a new view needs the slot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{CatalogView, InputRead};
use crate::catalog::Catalog;
use crate::config::Config;

/// How views behave and how long the registry keeps them.
#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    pub window: Duration,
    pub input_read: InputRead,
    /// Views untouched for this long are evicted.
    pub idle_ttl: Duration,
    /// Upper bound on open views.
    pub max_views: usize,
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        Self {
            window: config.debounce,
            input_read: config.search_input,
            idle_ttl: config.view_idle_ttl,
            max_views: config.max_views,
        }
    }
}

/// Open views keyed by id.
pub struct ViewRegistry {
    catalog: Arc<Catalog>,
    settings: ViewSettings,
    views: RwLock<HashMap<Uuid, Arc<CatalogView>>>,
}

impl ViewRegistry {
    pub fn new(catalog: Arc<Catalog>, settings: ViewSettings) -> Self {
        Self {
            catalog,
            settings,
            views: RwLock::new(HashMap::new()),
        }
    }

    /// Open a new view over the catalog, making room first if the registry is full.
    pub async fn open(&self) -> Arc<CatalogView> {
        let view = Arc::new(CatalogView::new(
            Arc::clone(&self.catalog),
            self.settings.window,
            self.settings.input_read,
        ));

        let mut views = self.views.write().await;
        if views.len() >= self.settings.max_views {
            self.evict_idle_locked(&mut views);
        }
        while views.len() >= self.settings.max_views.max(1) {
            let oldest = views
                .iter()
                .max_by_key(|(_, v)| v.idle_for())
                .map(|(id, _)| *id);
            let Some(oldest) = oldest else { break };
            if let Some(evicted) = views.remove(&oldest) {
                evicted.close();
                tracing::warn!(
                    "View limit {} reached, evicted view {}",
                    self.settings.max_views,
                    oldest
                );
            }
        }
        views.insert(view.id(), Arc::clone(&view));
        tracing::debug!("Opened view {} ({} open)", view.id(), views.len());
        drop(views);
        view
    }

    /// Look up an open view. A view idle past the TTL is treated as gone.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<CatalogView>> {
        let view = self.views.read().await.get(id).cloned()?;
        if view.idle_for() >= self.settings.idle_ttl {
            self.close(id).await;
            return None;
        }
        Some(view)
    }

    /// Close a view, cancelling its pending pass. Returns false if it was not open.
    pub async fn close(&self, id: &Uuid) -> bool {
        match self.views.write().await.remove(id) {
            Some(view) => {
                let cancelled = view.close();
                tracing::debug!("Closed view {} (pending pass cancelled: {})", id, cancelled);
                true
            }
            None => false,
        }
    }

    /// Drop every view idle past the TTL. Returns how many were evicted.
    pub async fn evict_idle(&self) -> usize {
        let mut views = self.views.write().await;
        self.evict_idle_locked(&mut views)
    }

    fn evict_idle_locked(&self, views: &mut HashMap<Uuid, Arc<CatalogView>>) -> usize {
        let ttl = self.settings.idle_ttl;
        let before = views.len();
        views.retain(|id, view| {
            if view.idle_for() < ttl {
                return true;
            }
            let cancelled = view.close();
            tracing::debug!("Evicted idle view {} (pending pass cancelled: {})", id, cancelled);
            false
        });
        let evicted = before - views.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle views ({} open)", evicted, views.len());
        }
        evicted
    }

    /// Sweep idle views in the background every `period`.
    pub fn spawn_sweeper(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.evict_idle().await;
            }
        })
    }
}
