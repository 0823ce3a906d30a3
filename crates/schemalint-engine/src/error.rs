//! Engine error type
//!
//! Every variant aborts the run; a failed run produces no outcome.

use schemalint_catalog::FetchError;
use schemalint_core::{ConfigError, RuleError};

/// Errors that abort a lint run
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Unknown rule name, malformed ignore or invalid ignore pattern
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The extractor could not connect or read the catalog
    #[error("Schema extraction failed: {0}")]
    Extraction(#[from] FetchError),

    /// A rule rejected its options or could not evaluate the snapshot
    #[error("Rule failed on schema \"{schema}\": {source}")]
    RuleFailed {
        schema: String,
        #[source]
        source: RuleError,
    },

    /// A configured plugin reference has no registered rule source
    #[error("Unknown plugin: \"{0}\"")]
    UnknownPlugin(String),

    /// A configured schema is absent from the extraction result
    #[error("Schema \"{0}\" was not returned by the extractor")]
    MissingSchema(String),
}
