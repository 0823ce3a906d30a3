//! Extractor trait for fetching schema snapshots

use std::collections::BTreeMap;

use schemalint_core::SchemaSnapshot;

/// Extracted snapshots keyed by schema name
pub type SchemaSnapshots = BTreeMap<String, SchemaSnapshot>;

/// Errors that can occur when extracting schemas
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Source of schema snapshots
#[async_trait::async_trait]
pub trait SchemaExtractor: Send + Sync {
    /// Extractor name for logs (e.g. "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Extract every named schema
    ///
    /// The result has one entry per requested name. A schema that does not
    /// exist in the database comes back empty rather than missing.
    async fn extract_schemas(&self, schemas: &[String]) -> Result<SchemaSnapshots, FetchError>;

    /// Check that the source is reachable
    async fn test_connection(&self) -> Result<(), FetchError>;
}
