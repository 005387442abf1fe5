use thiserror::Error;

use super::storage::StorageError;

/// Errors surfaced by favorites mutations.
///
/// Malformed persisted records are never an error; they are dropped during
/// load.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// The storage medium could not be read
    #[error("Failed to read favorites: {0}")]
    StorageRead(#[source] StorageError),

    /// The storage medium rejected the write; in-memory state is unchanged
    #[error("Failed to save favorites: {0}")]
    StorageWrite(#[source] StorageError),

    #[error("Failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),

    /// The recipe would not survive a reload
    #[error("Recipe cannot be saved as a favorite: {reason}")]
    InvalidRecipe { reason: String },
}

impl FavoritesError {
    pub fn error_type(&self) -> &'static str {
        match self {
            FavoritesError::StorageRead(_) => "storage_read",
            FavoritesError::StorageWrite(_) => "storage_write",
            FavoritesError::Encode(_) => "encode_error",
            FavoritesError::InvalidRecipe { .. } => "invalid_recipe",
        }
    }
}
