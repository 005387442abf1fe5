//! Persisted, deduplicated favorite recipes.
//!
//! A single [`FavoritesStore`] is shared by every screen. Mutations are
//! serialized and persisted before they become visible; subscribers are
//! notified of each new snapshot.

mod error;
mod storage;
mod store;

pub use error::FavoritesError;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{sanitize_favorites, FavoritesSnapshot, FavoritesStore, LoadReport, FAVORITES_KEY};
