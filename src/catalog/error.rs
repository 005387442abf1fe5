use thiserror::Error;

/// Errors that can occur while fetching from the recipe catalog.
///
/// All variants are recoverable: the search session records them and the
/// next commit retries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Credentials are missing from config and environment
    #[error("Catalog not configured: {reason}")]
    NotConfigured { reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to initialize catalog client: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// Failed to connect or transfer
    #[error("Connection to catalog failed: {source}")]
    Connection {
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded total timeout
    #[error("Catalog request timed out after {duration}s")]
    Timeout { duration: u64 },

    /// Catalog returned a non-success status
    #[error("Catalog error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Stable error type string for display and logs
    pub fn error_type(&self) -> &'static str {
        match self {
            CatalogError::NotConfigured { .. } => "not_configured",
            CatalogError::ClientInit(_) => "client_init",
            CatalogError::Connection { .. } => "connection_error",
            CatalogError::Timeout { .. } => "timeout",
            CatalogError::Upstream { .. } => "upstream_error",
            CatalogError::Decode(_) => "decode_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_type() {
        let err = CatalogError::Upstream {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(err.error_type(), "upstream_error");
        assert_eq!(err.to_string(), "Catalog error: 401 - bad key");
    }

    #[test]
    fn timeout_error_type() {
        let err = CatalogError::Timeout { duration: 15 };
        assert_eq!(err.error_type(), "timeout");
    }
}
