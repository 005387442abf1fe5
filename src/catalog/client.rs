use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::timeout;

use crate::config::{CatalogConfig, CatalogCredentials, CredentialStatus};
use crate::filter::{CanonicalQuery, FacetFamily};
use crate::recipe::{parse_record, Recipe, RecordPolicy};

use super::error::CatalogError;

/// Longest upstream error body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// The remote recipe catalog.
///
/// The search session only ever talks to this trait, so tests and
/// alternative catalogs can stand in for the HTTP implementation.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Returns the name of this catalog for logging.
    fn name(&self) -> &'static str;

    /// Run one search.
    ///
    /// An empty result is a valid answer, not an error.
    async fn search(&self, query: &CanonicalQuery) -> Result<Vec<Recipe>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    recipe: Option<Value>,
}

/// Decode a catalog response body into recipes.
///
/// Hits that are not well-formed recipes are dropped with a warning so one
/// bad record does not fail the whole search.
pub fn decode_hits(body: &str) -> Result<Vec<Recipe>, CatalogError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    let total = response.hits.len();
    let recipes: Vec<Recipe> = response
        .hits
        .into_iter()
        .filter_map(|hit| {
            let record = hit.recipe?;
            match parse_record(record, RecordPolicy::CatalogHit) {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping malformed catalog hit");
                    None
                }
            }
        })
        .collect();

    if recipes.len() != total {
        tracing::debug!(
            total,
            kept = recipes.len(),
            "Catalog response contained unusable hits"
        );
    }
    Ok(recipes)
}

/// The request URL carries `app_key`; it must not reach error messages.
fn connection_error(source: reqwest::Error) -> CatalogError {
    CatalogError::Connection {
        source: source.without_url(),
    }
}

/// HTTP client for the Edamam recipe search API.
pub struct EdamamClient {
    client: Client,
    base_url: String,
    credentials: CatalogCredentials,
    request_timeout: Duration,
}

impl EdamamClient {
    /// Build a client from config, resolving credentials from config + env.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match config.resolve_credentials() {
            CredentialStatus::Configured(credentials) => {
                Self::with_credentials(config, credentials)
            }
            CredentialStatus::Unconfigured { reason } => {
                Err(CatalogError::NotConfigured { reason })
            }
        }
    }

    pub fn with_credentials(
        config: &CatalogConfig,
        credentials: CatalogCredentials,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .build()
            .map_err(CatalogError::ClientInit)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            request_timeout: Duration::from_secs(config.timeout_seconds as u64),
        })
    }

    /// Query parameters for one search. Empty facet families are omitted.
    fn params(&self, query: &CanonicalQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.text().to_string()),
            ("app_id", self.credentials.app_id.clone()),
            ("app_key", self.credentials.app_key.expose().to_string()),
        ];
        for family in FacetFamily::all() {
            let facets = query.facets(*family);
            if !facets.is_empty() {
                let joined: Vec<&str> = facets.iter().map(String::as_str).collect();
                params.push((family.wire_param(), joined.join(",")));
            }
        }
        params
    }

    async fn do_search(&self, query: &CanonicalQuery) -> Result<Vec<Recipe>, CatalogError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&self.params(query))
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(connection_error)?;

        if !status.is_success() {
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        decode_hits(&body)
    }
}

#[async_trait]
impl CatalogClient for EdamamClient {
    fn name(&self) -> &'static str {
        "edamam"
    }

    async fn search(&self, query: &CanonicalQuery) -> Result<Vec<Recipe>, CatalogError> {
        tracing::debug!(query = %query, "Searching catalog");
        match timeout(self.request_timeout, self.do_search(query)).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout {
                duration: self.request_timeout.as_secs(),
            }),
        }
    }
}
