//! Schemalint Core
//!
//! Shared domain model: the extracted schema snapshot, the run configuration,
//! the rule contract and the issue/report types.
//! Rule names and issue identifiers are the matching keys for ignore
//! specifications, so they must stay stable.

pub mod config;
pub mod report;
pub mod rule;
pub mod schema;

pub use config::{
    Config, ConfigError, ConnectionConfig, IgnoreSpec, RuleConfigMap, RuleEntry, RuleState,
    SchemaConfig,
};
pub use report::{Issue, Report, ReportSummary, ReportVersion, RunOutcome};
pub use rule::{Rule, RuleContext, RuleDocs, RuleError, RuleSource};
pub use schema::{Column, ColumnReference, SchemaSnapshot, Table, View};
