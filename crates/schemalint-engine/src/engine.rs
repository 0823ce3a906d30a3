//! Run orchestration

use schemalint_catalog::{SchemaExtractor, SchemaSnapshots};
use schemalint_core::{Config, RunOutcome};
use tracing::info;

use crate::aggregator::{IssueSink, ReportAggregator};
use crate::error::EngineError;
use crate::executor::execute_schema;
use crate::ignore::IgnoreMatchers;
use crate::plugin::PluginResolver;
use crate::registry::RuleRegistry;
use crate::resolver::resolve;

/// Registry and ignores for one configuration
///
/// Both are built before any schema is read, so configuration mistakes in
/// plugins or ignores surface before the database is touched.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: RuleRegistry,
    ignores: IgnoreMatchers,
}

impl Engine {
    pub fn new(registry: RuleRegistry, ignores: IgnoreMatchers) -> Self {
        Self { registry, ignores }
    }

    /// Built-in rules, then each configured plugin in order
    pub fn from_config(config: &Config, plugins: &dyn PluginResolver) -> Result<Self, EngineError> {
        let mut sources = vec![schemalint_rules::builtin_rules()];
        for reference in &config.plugins {
            sources.push(plugins.resolve(reference)?);
        }

        let registry = RuleRegistry::build(sources);
        let ignores = IgnoreMatchers::compile(&config.ignores)?;

        Ok(Self::new(registry, ignores))
    }

    /// Lint every configured schema, in configuration order
    ///
    /// Each call starts from a fresh outcome. Every issue that survives the
    /// ignores reaches `sink` before this returns.
    pub fn run(
        &self,
        config: &Config,
        snapshots: &SchemaSnapshots,
        sink: &mut dyn IssueSink,
    ) -> Result<RunOutcome, EngineError> {
        let mut aggregator = ReportAggregator::new(&self.ignores, sink);

        for schema_config in &config.schemas {
            let rules = resolve(&config.rules, &schema_config.rules, &self.registry)?;
            let snapshot = snapshots
                .get(&schema_config.name)
                .ok_or_else(|| EngineError::MissingSchema(schema_config.name.clone()))?;

            info!(
                schema = %schema_config.name,
                rules = rules.len(),
                enabled = rules.enabled().count(),
                "Linting schema"
            );
            aggregator.record_schema();
            execute_schema(&self.registry, snapshot, &rules, &mut aggregator)?;
        }

        let outcome = aggregator.finalize();
        info!(
            schemas = outcome.schemas_checked,
            rules_run = outcome.rules_run,
            issues = outcome.issues.len(),
            "Lint finished"
        );

        Ok(outcome)
    }
}

/// Extract the configured schemas once and lint them
pub async fn process_database(
    config: &Config,
    extractor: &dyn SchemaExtractor,
    plugins: &dyn PluginResolver,
    sink: &mut dyn IssueSink,
) -> Result<RunOutcome, EngineError> {
    let engine = Engine::from_config(config, plugins)?;

    info!(
        target_db = %config.connection.describe(),
        extractor = extractor.name(),
        "Extracting schemas"
    );
    let snapshots = extractor.extract_schemas(&config.schema_names()).await?;

    engine.run(config, &snapshots, sink)
}
