use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogClient, CatalogError};
use crate::filter::CanonicalQuery;
use crate::recipe::Recipe;

use super::state::{ErrorInfo, SearchSessionState, SearchStatus};

/// What a call to [`SearchSession::commit`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Query equal to the live one; no fetch was issued.
    Unchanged,
    /// A fetch ran and its result (success or failure) is now the state.
    Applied,
    /// A fetch ran but a newer commit replaced it before it finished.
    Superseded,
}

/// Identifies one issued fetch.
#[derive(Debug, Clone)]
struct FetchTag {
    seq: u64,
    query: CanonicalQuery,
}

/// The single authoritative "current search".
///
/// Cheap to clone; clones share state. Every commit that changes the query
/// issues exactly one fetch, and only the fetch belonging to the most
/// recent commit may write its result back.
#[derive(Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    catalog: Arc<dyn CatalogClient>,
    state: Mutex<SessionState>,
    updates: watch::Sender<SearchSessionState>,
}

struct SessionState {
    view: SearchSessionState,
    /// Sequence number of the most recently issued fetch.
    latest: u64,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        let (updates, _) = watch::channel(SearchSessionState::default());
        Self {
            inner: Arc::new(SessionInner {
                catalog,
                state: Mutex::new(SessionState {
                    view: SearchSessionState::default(),
                    latest: 0,
                }),
                updates,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchSessionState {
        self.inner.state.lock().view.clone()
    }

    pub fn committed_query(&self) -> CanonicalQuery {
        self.inner.state.lock().view.committed_query.clone()
    }

    /// Receive every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SearchSessionState> {
        self.inner.updates.subscribe()
    }

    /// Begin the session with an initial query. Always fetches.
    pub async fn start(&self, initial_query: CanonicalQuery) -> CommitOutcome {
        let tag = self.begin(initial_query, true);
        match tag {
            Some(tag) => self.run(tag).await,
            None => CommitOutcome::Unchanged,
        }
    }

    /// Make `query` the committed query.
    ///
    /// No fetch is issued when `query` equals the committed query and that
    /// query is either already answered (`Ready`) or being fetched
    /// (`Loading`). After a failure any commit retries.
    pub async fn commit(&self, query: CanonicalQuery) -> CommitOutcome {
        let tag = self.begin(query, false);
        match tag {
            Some(tag) => self.run(tag).await,
            None => CommitOutcome::Unchanged,
        }
    }

    /// [`commit`](Self::commit) without waiting for the fetch.
    ///
    /// The state is already `Loading` with the new query when this returns;
    /// the fetch runs on a spawned task. Returns `None` when no fetch was
    /// needed. Must be called from within a tokio runtime.
    pub fn commit_detached(&self, query: CanonicalQuery) -> Option<JoinHandle<CommitOutcome>> {
        let tag = self.begin(query, false)?;
        let session = self.clone();
        Some(tokio::spawn(async move { session.run(tag).await }))
    }

    fn begin(&self, query: CanonicalQuery, force: bool) -> Option<FetchTag> {
        let mut state = self.inner.state.lock();

        let live = matches!(
            state.view.status,
            SearchStatus::Ready | SearchStatus::Loading
        );
        if !force && live && state.view.committed_query == query {
            tracing::debug!(query = %query, "Commit unchanged, skipping fetch");
            return None;
        }

        state.latest += 1;
        let tag = FetchTag {
            seq: state.latest,
            query: query.clone(),
        };

        state.view.committed_query = query;
        state.view.status = SearchStatus::Loading;
        state.view.error = None;
        self.inner.updates.send_replace(state.view.clone());

        tracing::info!(
            seq = tag.seq,
            query = %tag.query,
            catalog = self.inner.catalog.name(),
            "Search committed"
        );
        Some(tag)
    }

    async fn run(&self, tag: FetchTag) -> CommitOutcome {
        let result = self.inner.catalog.search(&tag.query).await;
        self.complete(tag, result)
    }

    fn complete(&self, tag: FetchTag, result: Result<Vec<Recipe>, CatalogError>) -> CommitOutcome {
        let mut state = self.inner.state.lock();

        if tag.seq != state.latest || tag.query != state.view.committed_query {
            tracing::debug!(
                seq = tag.seq,
                latest = state.latest,
                query = %tag.query,
                "Discarding superseded search response"
            );
            return CommitOutcome::Superseded;
        }

        match result {
            Ok(results) => {
                tracing::debug!(seq = tag.seq, hits = results.len(), "Search ready");
                state.view.results = results;
                state.view.status = SearchStatus::Ready;
                state.view.error = None;
            }
            Err(e) => {
                tracing::warn!(seq = tag.seq, error = %e, "Search failed");
                state.view.status = SearchStatus::Failed;
                state.view.error = Some(ErrorInfo::from(&e));
            }
        }
        self.inner.updates.send_replace(state.view.clone());
        CommitOutcome::Applied
    }
}
