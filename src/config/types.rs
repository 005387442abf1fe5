use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub featured: FeaturedConfig,
}

/// Remote recipe catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL for the catalog API (e.g., "https://api.edamam.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Application id sent as `app_id`.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Application key sent as `app_key`.
    #[serde(default)]
    pub app_key: Option<String>,
    /// Total request timeout in seconds (default: 15).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Local persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding persisted state. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Featured preview on the home screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedConfig {
    /// Fixed query used to fetch the preview pool.
    #[serde(default = "default_featured_query")]
    pub query: String,
    /// Maximum number of recipes sampled from the pool (default: 5).
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_base_url() -> String {
    "https://api.edamam.com".to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_featured_query() -> String {
    "popular".to_string()
}

fn default_sample_size() -> usize {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_id: None,
            app_key: None,
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for FeaturedConfig {
    fn default() -> Self {
        Self {
            query: default_featured_query(),
            sample_size: default_sample_size(),
        }
    }
}

impl StorageConfig {
    /// The configured data dir, or `<platform data dir>/recipe-scout`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("recipe-scout"),
        }
    }
}
