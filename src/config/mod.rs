mod credentials;
mod loader;
mod types;

pub use credentials::{
    CatalogCredentials, CredentialStatus, SecureString, APP_ID_ENV, APP_KEY_ENV,
};
pub use loader::ConfigError;
pub use types::{CatalogConfig, Config, FeaturedConfig, StorageConfig};
