//! The live search and the featured preview.

mod featured;
mod search;
mod state;

pub use featured::{sample_recipes, FeaturedPreview};
pub use search::{CommitOutcome, SearchSession};
pub use state::{ErrorInfo, SearchSessionState, SearchStatus};
