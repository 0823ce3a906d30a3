//! Runs a schema's enabled rules in order

use schemalint_core::{ConfigError, Issue, RuleContext, RuleState, SchemaSnapshot};
use tracing::{debug, warn};

use crate::aggregator::ReportAggregator;
use crate::error::EngineError;
use crate::registry::RuleRegistry;
use crate::resolver::EffectiveRuleSet;

/// Invoke every enabled rule of `rules` against `schema`
///
/// The first rule error aborts; issues already reported stay reported.
pub fn execute_schema(
    registry: &RuleRegistry,
    schema: &SchemaSnapshot,
    rules: &EffectiveRuleSet,
    aggregator: &mut ReportAggregator<'_>,
) -> Result<(), EngineError> {
    for (name, entry) in rules.iter() {
        match &entry.state {
            RuleState::Error => {}
            RuleState::Off => continue,
            RuleState::Other(state) => {
                warn!(rule = name, state = %state, "Unsupported rule state, skipping");
                continue;
            }
        }

        let rule = registry
            .lookup(name)
            .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))?;

        debug!(rule = name, schema = %schema.name, "Running rule");
        aggregator.record_rule_run();

        let mut reporter = |issue: Issue| aggregator.on_report(issue);
        let mut ctx = RuleContext::new(name, schema, &entry.options, &mut reporter);
        rule.process(&mut ctx).map_err(|source| EngineError::RuleFailed {
            schema: schema.name.clone(),
            source,
        })?;
    }

    Ok(())
}
