use std::sync::Arc;

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::CatalogClient;
use crate::config::FeaturedConfig;
use crate::filter::CanonicalQuery;
use crate::recipe::Recipe;

use super::search::{CommitOutcome, SearchSession};
use super::state::{SearchSessionState, SearchStatus};

/// Pick up to `amount` recipes from `pool` without replacement.
pub fn sample_recipes<R: Rng + ?Sized>(pool: &[Recipe], amount: usize, rng: &mut R) -> Vec<Recipe> {
    pool.choose_multiple(rng, amount).cloned().collect()
}

/// Random preview of the catalog for the home screen.
///
/// A search session pinned to a fixed query. The random pick happens once
/// per completed fetch on the client; it is never part of the query, so
/// reading the preview repeatedly does not refetch or reshuffle.
pub struct FeaturedPreview {
    session: SearchSession,
    query: CanonicalQuery,
    sample_size: usize,
    picks: Mutex<Vec<Recipe>>,
}

impl FeaturedPreview {
    pub fn new(catalog: Arc<dyn CatalogClient>, config: &FeaturedConfig) -> Self {
        Self::with_session(
            SearchSession::new(catalog),
            CanonicalQuery::new(&config.query),
            config.sample_size,
        )
    }

    pub fn with_session(session: SearchSession, query: CanonicalQuery, sample_size: usize) -> Self {
        Self {
            session,
            query,
            sample_size,
            picks: Mutex::new(Vec::new()),
        }
    }

    /// Fetch a fresh pool and re-sample. Returns the resulting status.
    pub async fn refresh(&self) -> SearchStatus {
        let outcome = self.session.start(self.query.clone()).await;
        let state = self.session.state();
        if outcome == CommitOutcome::Applied && state.status == SearchStatus::Ready {
            self.resample_with(&mut rand::thread_rng());
        }
        state.status
    }

    /// Re-sample from the last fetched pool with the given RNG.
    pub fn resample_with<R: Rng + ?Sized>(&self, rng: &mut R) {
        let pool = self.session.state().results;
        let picks = sample_recipes(&pool, self.sample_size, rng);
        tracing::debug!(pool = pool.len(), picked = picks.len(), "Featured sample taken");
        *self.picks.lock() = picks;
    }

    /// The current sample.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.picks.lock().clone()
    }

    /// State of the underlying session (loading/error for the home screen).
    pub fn state(&self) -> SearchSessionState {
        self.session.state()
    }

    pub fn query(&self) -> &CanonicalQuery {
        &self.query
    }
}
