use crate::filter::FilterSet;
use crate::ui::mvi::UiState;

/// State of the search-filters modal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterDialogState {
    #[default]
    Hidden,
    Editing {
        /// Scratch copy being edited. Independent of the committed filters.
        draft: FilterSet,
        /// The committed filters the draft was opened from.
        baseline: FilterSet,
        /// True when `draft` differs from `baseline`.
        dirty: bool,
    },
}

impl UiState for FilterDialogState {}

impl FilterDialogState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn draft(&self) -> Option<&FilterSet> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Hidden => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Editing { dirty: true, .. })
    }
}
