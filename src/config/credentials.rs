//! Catalog credential resolution.
//!
//! Credentials come from the config file, with environment variables taking
//! precedence so keys can stay out of the file.

use super::types::CatalogConfig;

pub const APP_ID_ENV: &str = "RECIPE_SCOUT_APP_ID";
pub const APP_KEY_ENV: &str = "RECIPE_SCOUT_APP_KEY";

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Resolved catalog credentials.
#[derive(Debug, Clone)]
pub struct CatalogCredentials {
    pub app_id: String,
    pub app_key: SecureString,
}

/// Status of credential resolution.
#[derive(Debug, Clone)]
pub enum CredentialStatus {
    Configured(CatalogCredentials),
    Unconfigured {
        /// Reason for missing configuration.
        reason: String,
    },
}

impl CatalogConfig {
    /// Resolve credentials from the process environment and this config.
    pub fn resolve_credentials(&self) -> CredentialStatus {
        self.resolve_credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolve credentials with an injectable environment lookup.
    pub fn resolve_credentials_with<F>(&self, env: F) -> CredentialStatus
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |env_name: &str, configured: &Option<String>| {
            env(env_name)
                .or_else(|| configured.clone())
                .filter(|v| !v.trim().is_empty())
        };

        let Some(app_id) = pick(APP_ID_ENV, &self.app_id) else {
            return CredentialStatus::Unconfigured {
                reason: format!("app_id is not set (config or {})", APP_ID_ENV),
            };
        };
        let Some(app_key) = pick(APP_KEY_ENV, &self.app_key) else {
            return CredentialStatus::Unconfigured {
                reason: format!("app_key is not set (config or {})", APP_KEY_ENV),
            };
        };

        CredentialStatus::Configured(CatalogCredentials {
            app_id,
            app_key: SecureString::new(app_key),
        })
    }
}
