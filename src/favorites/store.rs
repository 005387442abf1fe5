use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{watch, Mutex};

use crate::recipe::{parse_record, Recipe, RecordPolicy};

use super::error::FavoritesError;
use super::storage::{KeyValueStorage, StorageError};

/// Storage key holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "favorites";

/// Immutable view of the favorites at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSnapshot {
    loaded: bool,
    recipes: Arc<Vec<Recipe>>,
}

impl FavoritesSnapshot {
    /// Whether any load has completed. Before that, everything reads as
    /// "not a favorite".
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    /// Favorites in insertion order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub kept: usize,
    /// Malformed or duplicate records that were discarded.
    pub dropped: usize,
}

/// Parse a persisted favorites blob, discarding anything unusable.
///
/// Never fails: a blob that is not a JSON array yields an empty set, and
/// individual records missing `uri`, `label` or `image` (or repeating an
/// earlier id) are dropped.
pub fn sanitize_favorites(blob: &str) -> (Vec<Recipe>, LoadReport) {
    let entries = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!("Persisted favorites are not an array, ignoring");
            return (Vec::new(), LoadReport::default());
        }
        Err(e) => {
            tracing::warn!(error = %e, "Persisted favorites are not valid JSON, ignoring");
            return (Vec::new(), LoadReport::default());
        }
    };

    let mut seen = HashSet::new();
    let mut recipes = Vec::with_capacity(entries.len());
    let mut report = LoadReport::default();

    for entry in entries {
        match parse_record(entry, RecordPolicy::Favorite) {
            Ok(recipe) if seen.insert(recipe.id.clone()) => recipes.push(recipe),
            Ok(recipe) => {
                tracing::warn!(id = %recipe.id, "Dropping duplicate favorite");
                report.dropped += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed favorite");
                report.dropped += 1;
            }
        }
    }

    report.kept = recipes.len();
    (recipes, report)
}

/// Shared, persisted favorites.
///
/// One instance is shared by every screen. Reads are answered from the
/// latest published snapshot and never wait; mutations are serialized
/// through a write gate and only publish after the storage write succeeds,
/// so readers never observe a favorite that failed to persist.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    storage: Arc<dyn KeyValueStorage>,
    snapshot: watch::Sender<FavoritesSnapshot>,
    /// Held for the whole read-modify-write of a mutation or load.
    write_gate: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (snapshot, _) = watch::channel(FavoritesSnapshot::default());
        Self {
            inner: Arc::new(StoreInner {
                storage,
                snapshot,
                write_gate: Mutex::new(()),
            }),
        }
    }

    /// Whether `id` is a favorite in the latest snapshot.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.inner.snapshot.borrow().contains(id)
    }

    /// All favorites in insertion order.
    pub fn list_all(&self) -> Vec<Recipe> {
        self.inner.snapshot.borrow().recipes().to_vec()
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FavoritesSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Read and sanitize the persisted favorites, replacing the snapshot.
    ///
    /// # Errors
    /// Returns `StorageRead` if the medium itself fails. Malformed content
    /// is not an error.
    pub async fn load(&self) -> Result<LoadReport, FavoritesError> {
        let _gate = self.inner.write_gate.lock().await;
        let (_, report) = self.load_locked().await?;
        Ok(report)
    }

    /// Add a favorite. Returns `false` if it was already present.
    ///
    /// # Errors
    /// `StorageWrite` if persisting fails; the snapshot is left unchanged.
    pub async fn add(&self, recipe: Recipe) -> Result<bool, FavoritesError> {
        validate_favorite(&recipe)?;
        self.detached(move |store| async move {
            let _gate = store.inner.write_gate.lock().await;
            let current = store.current_locked().await?;
            if current.iter().any(|r| r.id == recipe.id) {
                return Ok(false);
            }
            store.insert_locked(&current, recipe).await?;
            Ok(true)
        })
        .await
    }

    /// Remove a favorite. Returns `false` if it was not present.
    ///
    /// # Errors
    /// `StorageWrite` if persisting fails; the snapshot is left unchanged.
    pub async fn remove(&self, id: &str) -> Result<bool, FavoritesError> {
        let id = id.to_string();
        self.detached(move |store| async move {
            let _gate = store.inner.write_gate.lock().await;
            let current = store.current_locked().await?;
            if !current.iter().any(|r| r.id == id) {
                return Ok(false);
            }
            store.delete_locked(&current, &id).await?;
            Ok(true)
        })
        .await
    }

    /// Flip favorite status. Returns the new status.
    ///
    /// The decision is made against the store's state once the write gate
    /// is held, not against whatever a screen last rendered.
    pub async fn toggle(&self, recipe: Recipe) -> Result<bool, FavoritesError> {
        validate_favorite(&recipe)?;
        self.detached(move |store| async move {
            let _gate = store.inner.write_gate.lock().await;
            let current = store.current_locked().await?;
            if current.iter().any(|r| r.id == recipe.id) {
                store.delete_locked(&current, &recipe.id).await?;
                Ok(false)
            } else {
                store.insert_locked(&current, recipe).await?;
                Ok(true)
            }
        })
        .await
    }

    /// Run a mutation on its own task.
    ///
    /// A caller that stops waiting (timeout, dropped UI future) cannot cut a
    /// mutation between its storage write and the publish; the gate stays
    /// held until both are done.
    async fn detached<T, F, Fut>(&self, op: F) -> Result<T, FavoritesError>
    where
        F: FnOnce(FavoritesStore) -> Fut,
        Fut: Future<Output = Result<T, FavoritesError>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(op(self.clone()))
            .await
            .map_err(|e| FavoritesError::StorageWrite(StorageError::Task(e.to_string())))?
    }

    async fn insert_locked(
        &self,
        current: &[Recipe],
        recipe: Recipe,
    ) -> Result<(), FavoritesError> {
        let id = recipe.id.clone();
        let mut next = current.to_vec();
        next.push(recipe);
        self.persist_locked(next).await?;
        tracing::info!(id = %id, "Favorite added");
        Ok(())
    }

    async fn delete_locked(&self, current: &[Recipe], id: &str) -> Result<(), FavoritesError> {
        let next: Vec<Recipe> = current.iter().filter(|r| r.id != id).cloned().collect();
        self.persist_locked(next).await?;
        tracing::info!(id = %id, "Favorite removed");
        Ok(())
    }

    /// Current favorites, loading first if nothing has loaded yet.
    ///
    /// Must be called with the write gate held.
    async fn current_locked(&self) -> Result<Arc<Vec<Recipe>>, FavoritesError> {
        let snapshot = self.inner.snapshot.borrow().clone();
        if snapshot.loaded {
            return Ok(snapshot.recipes);
        }
        let (recipes, _) = self.load_locked().await?;
        Ok(recipes)
    }

    async fn load_locked(&self) -> Result<(Arc<Vec<Recipe>>, LoadReport), FavoritesError> {
        let blob = self
            .inner
            .storage
            .get(FAVORITES_KEY)
            .await
            .map_err(FavoritesError::StorageRead)?;

        let (recipes, report) = match blob {
            Some(blob) => sanitize_favorites(&blob),
            None => (Vec::new(), LoadReport::default()),
        };

        tracing::debug!(
            kept = report.kept,
            dropped = report.dropped,
            "Favorites loaded"
        );

        let recipes = Arc::new(recipes);
        self.publish(recipes.clone());
        Ok((recipes, report))
    }

    async fn persist_locked(&self, next: Vec<Recipe>) -> Result<(), FavoritesError> {
        let blob = serde_json::to_string(&next)?;
        if let Err(e) = self.inner.storage.set(FAVORITES_KEY, &blob).await {
            tracing::warn!(error = %e, "Failed to persist favorites, keeping previous state");
            return Err(FavoritesError::StorageWrite(e));
        }
        self.publish(Arc::new(next));
        Ok(())
    }

    fn publish(&self, recipes: Arc<Vec<Recipe>>) {
        self.inner.snapshot.send_replace(FavoritesSnapshot {
            loaded: true,
            recipes,
        });
    }
}

/// Reject recipes that `sanitize_favorites` would drop on the next load.
fn validate_favorite(recipe: &Recipe) -> Result<(), FavoritesError> {
    let missing = if recipe.id.trim().is_empty() {
        Some("id")
    } else if recipe.title.trim().is_empty() {
        Some("title")
    } else if recipe
        .image_url
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        Some("image")
    } else {
        None
    };

    match missing {
        Some(field) => Err(FavoritesError::InvalidRecipe {
            reason: format!("missing {}", field),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_order_and_drops_bad_records() {
        let blob = r#"[
            {"uri": "r1", "label": "One", "image": "i1"},
            {"uri": "r2", "label": "Two"},
            null,
            {"uri": "r3", "label": "Three", "image": "i3"},
            {"uri": "r1", "label": "One again", "image": "i1"}
        ]"#;
        let (recipes, report) = sanitize_favorites(blob);
        let ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);
        assert_eq!(recipes[0].title, "One");
        assert_eq!(report, LoadReport { kept: 2, dropped: 3 });
    }

    #[test]
    fn sanitize_non_array_is_empty() {
        let (recipes, report) = sanitize_favorites(r#"{"uri": "r1"}"#);
        assert!(recipes.is_empty());
        assert_eq!(report.kept, 0);

        let (recipes, _) = sanitize_favorites("not json at all");
        assert!(recipes.is_empty());
    }

    #[test]
    fn validate_requires_image() {
        let recipe = Recipe {
            id: "r1".to_string(),
            title: "One".to_string(),
            image_url: None,
            cuisine_types: None,
            calories: None,
            ingredient_lines: vec![],
            external_url: None,
        };
        assert!(matches!(
            validate_favorite(&recipe),
            Err(FavoritesError::InvalidRecipe { .. })
        ));
    }
}
