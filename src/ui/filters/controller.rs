use crate::filter::{
    from_canonical, to_canonical, CanonicalQuery, FacetFamily, FacetRegistry, FilterSet,
};
use crate::session::{CommitOutcome, SearchSession};
use crate::ui::filters::intent::FilterDialogIntent;
use crate::ui::filters::reducer::FilterDialogReducer;
use crate::ui::filters::state::FilterDialogState;
use crate::ui::mvi::Reducer;

/// Owns the filter modal's draft and hands it to the search session on
/// commit.
///
/// Nothing the session can see changes until [`commit`](Self::commit).
#[derive(Debug, Default)]
pub struct FilterDraftController {
    state: FilterDialogState,
}

impl FilterDraftController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterDialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_visible()
    }

    /// Start editing a copy of `committed`. Reopening replaces any draft.
    pub fn open(&mut self, committed: &FilterSet) {
        self.dispatch(FilterDialogIntent::Open {
            committed: committed.clone(),
        });
    }

    /// Start editing from the session's committed query.
    pub fn open_from_session(&mut self, session: &SearchSession, registry: &FacetRegistry) {
        let committed = from_canonical(&session.committed_query(), registry);
        self.open(&committed);
    }

    /// Flip one option in the draft. No-op while closed.
    pub fn toggle(&mut self, family: FacetFamily, option: &str) {
        self.dispatch(FilterDialogIntent::Toggle {
            family,
            option: option.to_string(),
        });
    }

    pub fn clear_all(&mut self) {
        self.dispatch(FilterDialogIntent::ClearAll);
    }

    /// Close without applying.
    pub fn discard(&mut self) {
        if self.state.is_dirty() {
            tracing::debug!("Discarding edited filter draft");
        }
        self.dispatch(FilterDialogIntent::Discard);
    }

    /// Close the modal and commit the draft with the session's current text.
    ///
    /// Returns `None` if the modal was not open.
    pub async fn commit(&mut self, session: &SearchSession) -> Option<CommitOutcome> {
        let query = self.apply(session)?;
        Some(session.commit(query).await)
    }

    /// Close the dialog and return the query to commit: the session's
    /// committed text plus the draft. `None` if the dialog was not open.
    pub fn apply(&mut self, session: &SearchSession) -> Option<CanonicalQuery> {
        let draft = self.state.draft()?.clone();
        self.dispatch(FilterDialogIntent::Applied);
        Some(to_canonical(session.committed_query().text(), &draft))
    }

    fn dispatch(&mut self, intent: FilterDialogIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = FilterDialogReducer::reduce(state, intent);
    }
}
