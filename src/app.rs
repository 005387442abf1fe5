//! Facade between the rendering layer and the state engine.
//!
//! A screen only ever sends [`AppIntent`]s and renders [`AppSnapshot`]s.
//! Searches never hold up an intent: the session enters `Loading` at once
//! and the fetch runs on its own task.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogClient, CatalogError, EdamamClient};
use crate::config::{Config, FeaturedConfig};
use crate::favorites::{
    FavoritesError, FavoritesSnapshot, FavoritesStore, FileStorage, KeyValueStorage,
};
use crate::filter::{
    applied_filters_summary, to_canonical, FacetFamily, FacetRegistry, FilterSet,
};
use crate::recipe::Recipe;
use crate::session::{CommitOutcome, FeaturedPreview, SearchSession, SearchSessionState};
use crate::ui::filters::{FilterDialogState, FilterDraftController};

/// User intents coming back from any screen.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Search for new text, keeping the committed facets.
    CommitQuery { text: String },
    ToggleFavorite(Recipe),
    OpenFilters,
    ToggleDraftOption { family: FacetFamily, option: String },
    ApplyFilters,
    DiscardFilters,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Favorites(#[from] FavoritesError),
}

/// A fetch started by an intent. Awaiting it is optional; the result also
/// reaches the session state.
pub type SearchTask = JoinHandle<CommitOutcome>;

/// Everything a screen may render.
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub search: SearchSessionState,
    pub favorites: FavoritesSnapshot,
    pub filters: FilterDialogState,
    /// Labels of the committed facets, or "None".
    pub applied_filters: String,
}

pub struct RecipeApp {
    registry: FacetRegistry,
    session: SearchSession,
    favorites: FavoritesStore,
    draft: Mutex<FilterDraftController>,
    featured: FeaturedPreview,
}

impl RecipeApp {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        storage: Arc<dyn KeyValueStorage>,
        featured: &FeaturedConfig,
    ) -> Self {
        Self {
            registry: FacetRegistry::builtin(),
            session: SearchSession::new(catalog.clone()),
            favorites: FavoritesStore::new(storage),
            draft: Mutex::new(FilterDraftController::new()),
            featured: FeaturedPreview::new(catalog, featured),
        }
    }

    /// Wire up the HTTP catalog and on-disk storage described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let catalog: Arc<dyn CatalogClient> = Arc::new(EdamamClient::new(&config.catalog)?);
        let storage: Arc<dyn KeyValueStorage> =
            Arc::new(FileStorage::new(config.storage.resolved_data_dir()));
        Ok(Self::new(catalog, storage, &config.featured))
    }

    /// Load persisted favorites. A read failure is logged, not fatal:
    /// favorites read as empty until a later load succeeds.
    pub async fn load_favorites(&self) {
        match self.favorites.load().await {
            Ok(report) if report.dropped > 0 => {
                tracing::warn!(
                    kept = report.kept,
                    dropped = report.dropped,
                    "Some persisted favorites were unusable"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Could not load favorites"),
        }
    }

    /// Enter the results screen with text and filters chosen up front.
    pub async fn start_search(&self, text: &str, filters: &FilterSet) -> CommitOutcome {
        self.session.start(to_canonical(text, filters)).await
    }

    /// Apply one intent.
    ///
    /// Returns the spawned fetch when the intent started a search. Only a
    /// favorite toggle waits, and only for its storage write.
    pub async fn handle(&self, intent: AppIntent) -> Result<Option<SearchTask>, AppError> {
        let task = match intent {
            AppIntent::CommitQuery { text } => {
                let query = self.session.committed_query().with_text(&text);
                self.session.commit_detached(query)
            }
            AppIntent::ToggleFavorite(recipe) => {
                self.favorites.toggle(recipe).await?;
                None
            }
            AppIntent::OpenFilters => {
                self.draft
                    .lock()
                    .open_from_session(&self.session, &self.registry);
                None
            }
            AppIntent::ToggleDraftOption { family, option } => {
                self.draft.lock().toggle(family, &option);
                None
            }
            AppIntent::ApplyFilters => {
                let query = self.draft.lock().apply(&self.session);
                query.and_then(|query| self.session.commit_detached(query))
            }
            AppIntent::DiscardFilters => {
                self.draft.lock().discard();
                None
            }
        };
        Ok(task)
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let search = self.session.state();
        let applied_filters = applied_filters_summary(&search.committed_query, &self.registry);
        AppSnapshot {
            search,
            favorites: self.favorites.snapshot(),
            filters: self.draft.lock().state().clone(),
            applied_filters,
        }
    }

    pub fn registry(&self) -> &FacetRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn featured(&self) -> &FeaturedPreview {
        &self.featured
    }
}
