use crate::filter::{FacetFamily, FilterSet};
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum FilterDialogIntent {
    /// Show the modal with a copy of the committed filters.
    Open { committed: FilterSet },
    /// Flip one option in the draft.
    Toggle { family: FacetFamily, option: String },
    /// Deselect everything in the draft.
    ClearAll,
    /// Cancel: drop the draft, committed filters untouched.
    Discard,
    /// The draft has been handed to the search session.
    Applied,
}

impl Intent for FilterDialogIntent {}
