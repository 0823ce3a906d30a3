use schemalint_core::{Issue, Rule, RuleContext, RuleError, SchemaSnapshot};
use serde_json::Value;

/// Run `rule` against `schema` and collect what it reports
pub fn run_rule(
    rule: &dyn Rule,
    schema: &SchemaSnapshot,
    options: &[Value],
) -> Result<Vec<Issue>, RuleError> {
    let mut issues = Vec::new();
    let mut reporter = |issue: Issue| issues.push(issue);
    let mut ctx = RuleContext::new(rule.name(), schema, options, &mut reporter);
    rule.process(&mut ctx)?;
    Ok(issues)
}

/// `(identifier, message)` pairs, for compact assertions
pub fn pairs(issues: &[Issue]) -> Vec<(&str, &str)> {
    issues
        .iter()
        .map(|i| (i.identifier.as_str(), i.message.as_str()))
        .collect()
}
