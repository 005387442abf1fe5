//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_catalog;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use recipe_scout::catalog::{CatalogClient, CatalogError};
use recipe_scout::filter::CanonicalQuery;
use recipe_scout::recipe::Recipe;
use tokio::sync::oneshot;

pub type SearchResult = Result<Vec<Recipe>, CatalogError>;

/// A well-formed recipe that can be saved as a favorite.
pub fn recipe(id: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Recipe {}", id),
        image_url: Some(format!("https://img.example.com/{}.jpg", id)),
        cuisine_types: Some(vec!["italian".to_string()]),
        calories: Some(420.0),
        ingredient_lines: vec!["1 cup flour".to_string(), "2 eggs".to_string()],
        external_url: Some(format!("https://example.com/{}", id)),
    }
}

/// `n` recipes with ids `{prefix}0..{prefix}n`.
pub fn recipes(prefix: &str, n: usize) -> Vec<Recipe> {
    (0..n).map(|i| recipe(&format!("{}{}", prefix, i))).collect()
}

pub fn ids(recipes: &[Recipe]) -> Vec<String> {
    recipes.iter().map(|r| r.id.clone()).collect()
}

pub fn upstream_error() -> CatalogError {
    CatalogError::Upstream {
        status: 503,
        message: "unavailable".to_string(),
    }
}

enum Reply {
    Now(SearchResult),
    Gated(oneshot::Receiver<SearchResult>),
}

/// In-process catalog answering from a script.
///
/// Replies are consumed in call order. A gated reply blocks the call until
/// the test sends on the returned sender, which lets tests decide the order
/// in which concurrent fetches complete. Calls with no scripted reply
/// return an empty result.
#[derive(Default)]
pub struct ScriptedCatalog {
    calls: Mutex<Vec<CanonicalQuery>>,
    script: Mutex<VecDeque<Reply>>,
}

impl ScriptedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Next call returns `result` immediately.
    pub fn respond(&self, result: SearchResult) {
        self.script.lock().push_back(Reply::Now(result));
    }

    /// Next call waits until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<SearchResult> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<CanonicalQuery> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Wait until at least `n` searches have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        let start = std::time::Instant::now();
        while self.call_count() < n {
            assert!(
                start.elapsed() < Duration::from_secs(2),
                "timed out waiting for {} catalog calls, saw {}",
                n,
                self.call_count()
            );
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn search(&self, query: &CanonicalQuery) -> SearchResult {
        let reply = {
            self.calls.lock().push(query.clone());
            self.script.lock().pop_front()
        };
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(CatalogError::Decode("gate dropped".to_string()))),
            None => Ok(Vec::new()),
        }
    }
}
