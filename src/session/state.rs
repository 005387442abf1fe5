use crate::catalog::CatalogError;
use crate::filter::CanonicalQuery;
use crate::recipe::Recipe;

/// Lifecycle of the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// Displayable summary of a fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Stable classifier, see [`CatalogError::error_type`].
    pub kind: &'static str,
    pub message: String,
}

impl From<&CatalogError> for ErrorInfo {
    fn from(err: &CatalogError) -> Self {
        Self {
            kind: err.error_type(),
            message: err.to_string(),
        }
    }
}

/// Everything a results screen needs to render.
///
/// While `Loading`, `results` still holds the previous answer so the
/// screen does not flicker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSessionState {
    pub committed_query: CanonicalQuery,
    pub results: Vec<Recipe>,
    pub status: SearchStatus,
    pub error: Option<ErrorInfo>,
}

impl SearchSessionState {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// A completed search that matched nothing. Not an error.
    pub fn has_no_results(&self) -> bool {
        self.status == SearchStatus::Ready && self.results.is_empty()
    }
}
