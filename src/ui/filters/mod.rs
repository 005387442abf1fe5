//! The search-filters modal: edit a draft, then apply or discard it.

mod controller;
mod intent;
mod reducer;
mod state;

pub use controller::FilterDraftController;
pub use intent::FilterDialogIntent;
pub use reducer::FilterDialogReducer;
pub use state::FilterDialogState;
