//! Schema extraction for schemalint
//!
//! Extractors turn a list of schema names into [`SchemaSnapshot`]s. The engine
//! awaits one extraction per run, before any rule executes.
//!
//! ## Features
//!
//! - `postgres` (default) - PostgreSQL extraction via `pg_catalog`
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemalint_catalog::{PostgresExtractor, SchemaExtractor};
//!
//! let extractor = PostgresExtractor::connect(&config.connection).await?;
//! let snapshots = extractor.extract_schemas(&["public".to_string()]).await?;
//! ```
//!
//! [`SchemaSnapshot`]: schemalint_core::SchemaSnapshot

pub mod adapter;
pub mod mock;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use adapter::{FetchError, SchemaExtractor, SchemaSnapshots};
pub use mock::MockExtractor;
#[cfg(feature = "postgres")]
pub use postgres::PostgresExtractor;
