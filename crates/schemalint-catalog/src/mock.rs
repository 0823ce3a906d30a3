//! In-memory extractor for testing
//!
//! Returns predefined snapshots without connecting to any database. Useful for
//! engine tests and demos without credentials.
//!
//! ```rust,ignore
//! let extractor = MockExtractor::new();
//! extractor.add_schema(SchemaSnapshot::new("public").with_table(Table::new("users"))).await;
//! let snapshots = extractor.extract_schemas(&["public".to_string()]).await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use schemalint_core::SchemaSnapshot;
use tokio::sync::RwLock;

use crate::adapter::{FetchError, SchemaExtractor, SchemaSnapshots};

/// Mock extractor backed by a map of snapshots
///
/// Clones share the same storage and call counter.
#[derive(Clone, Default)]
pub struct MockExtractor {
    schemas: Arc<RwLock<HashMap<String, SchemaSnapshot>>>,

    /// Error returned by every call, if set
    failure: Option<FetchError>,

    /// Simulated latency (milliseconds)
    latency_ms: u64,

    extract_calls: Arc<AtomicUsize>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock extractor from pre-built snapshots
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = SchemaSnapshot>) -> Self {
        let schemas = snapshots
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();
        Self {
            schemas: Arc::new(RwLock::new(schemas)),
            ..Self::default()
        }
    }

    /// Add or replace a snapshot, keyed by its name
    pub async fn add_schema(&self, snapshot: SchemaSnapshot) {
        self.schemas
            .write()
            .await
            .insert(snapshot.name.clone(), snapshot);
    }

    /// Fail every call with a connection error
    pub fn with_connection_failure(self) -> Self {
        self.with_failure(FetchError::ConnectionError(
            "Simulated connection failure".to_string(),
        ))
    }

    /// Fail every call with `error`
    pub fn with_failure(mut self, error: FetchError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Delay every call by `latency_ms`
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Number of `extract_schemas` calls so far
    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

#[async_trait::async_trait]
impl SchemaExtractor for MockExtractor {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn extract_schemas(&self, schemas: &[String]) -> Result<SchemaSnapshots, FetchError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let stored = self.schemas.read().await;
        Ok(schemas
            .iter()
            .map(|name| {
                let snapshot = stored
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| SchemaSnapshot::new(name.clone()));
                (name.clone(), snapshot)
            })
            .collect())
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        self.simulate_latency().await;

        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalint_core::Table;

    #[tokio::test]
    async fn returns_requested_schemas_only() {
        let extractor = MockExtractor::from_snapshots(vec![
            SchemaSnapshot::new("public").with_table(Table::new("users")),
            SchemaSnapshot::new("audit"),
        ]);

        let snapshots = extractor
            .extract_schemas(&["public".to_string()])
            .await
            .unwrap();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots["public"].tables.len(), 1);
        assert_eq!(extractor.extract_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_schema_is_empty() {
        let extractor = MockExtractor::new();
        let snapshots = extractor
            .extract_schemas(&["missing".to_string()])
            .await
            .unwrap();

        assert_eq!(snapshots["missing"], SchemaSnapshot::new("missing"));
    }

    #[tokio::test]
    async fn simulated_failure() {
        let extractor = MockExtractor::new().with_connection_failure();

        assert!(extractor.test_connection().await.is_err());
        let err = extractor.extract_schemas(&[]).await.unwrap_err();
        assert!(matches!(err, FetchError::ConnectionError(_)));
    }
}
