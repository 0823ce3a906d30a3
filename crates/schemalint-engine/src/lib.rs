//! Schemalint engine - rule evaluation
//!
//! Pipeline for one run:
//! - [`RuleRegistry`]: built-in and plugin rule sources merged by name
//! - [`IgnoreMatchers`]: compiled ignore specifications
//! - [`resolve`]: per-schema effective rule set (global rules overlaid with
//!   schema overrides, every name checked against the registry)
//! - [`execute_schema`]: invokes each enabled rule against the snapshot
//! - [`ReportAggregator`]: filters issues through the ignores, forwards the
//!   rest to an [`IssueSink`] and accumulates the [`RunOutcome`]
//!
//! [`RunOutcome`]: schemalint_core::RunOutcome

pub mod aggregator;
pub mod engine;
pub mod error;
pub mod executor;
pub mod ignore;
pub mod plugin;
pub mod registry;
pub mod resolver;

pub use aggregator::{CollectingSink, IssueSink, ReportAggregator};
pub use engine::{process_database, Engine};
pub use error::EngineError;
pub use executor::execute_schema;
pub use ignore::{IgnoreMatcher, IgnoreMatchers};
pub use plugin::{PluginResolver, StaticPluginResolver};
pub use registry::RuleRegistry;
pub use resolver::{resolve, EffectiveRuleSet};
