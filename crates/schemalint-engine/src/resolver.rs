//! Effective rule set resolution
//!
//! A schema's rules are the global rules overlaid with the schema's own
//! entries: global order is kept, overridden entries are replaced in place
//! and schema-only rules are appended. Every name must be registered.

use schemalint_core::{ConfigError, RuleConfigMap, RuleEntry};

use crate::registry::RuleRegistry;

/// Rule entries for one schema, all known to the registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveRuleSet {
    rules: RuleConfigMap,
}

impl EffectiveRuleSet {
    /// Every entry in execution order, disabled ones included
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.rules.iter()
    }

    /// Entries whose state is `error`, in order
    pub fn enabled(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.rules.iter().filter(|(_, entry)| entry.state.is_enabled())
    }

    /// Entry for `name`, if configured for this schema
    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.rules.get(name)
    }

    /// Number of configured rules, disabled ones included
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the schema has no rule configuration at all
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Merge `schema_rules` over `global` and check every name, disabled ones included
pub fn resolve(
    global: &RuleConfigMap,
    schema_rules: &RuleConfigMap,
    registry: &RuleRegistry,
) -> Result<EffectiveRuleSet, ConfigError> {
    let rules = global.merge(schema_rules);

    if let Some(unknown) = rules.keys().find(|name| !registry.contains(name)) {
        return Err(ConfigError::UnknownRule(unknown.to_string()));
    }

    Ok(EffectiveRuleSet { rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemalint_core::RuleState;
    use serde_json::json;

    fn registry() -> RuleRegistry {
        RuleRegistry::build([schemalint_rules::builtin_rules()])
    }

    #[test]
    fn schema_entries_override_in_place() {
        let global = RuleConfigMap::new()
            .with("name-inflection", RuleEntry::error(vec![json!("singular")]))
            .with("row-level-security", RuleEntry::error(vec![]));
        let schema = RuleConfigMap::new()
            .with("mandatory-columns", RuleEntry::error(vec![json!([])]))
            .with("name-inflection", RuleEntry::error(vec![json!("plural")]));

        let effective = resolve(&global, &schema, &registry()).unwrap();

        let names: Vec<&str> = effective.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["name-inflection", "row-level-security", "mandatory-columns"]
        );
        assert_eq!(
            effective.get("name-inflection").unwrap().options,
            vec![json!("plural")]
        );
    }

    #[test]
    fn disabled_entries_are_kept_but_not_enabled() {
        let global = RuleConfigMap::new().with("row-level-security", RuleEntry::error(vec![]));
        let schema = RuleConfigMap::new().with("row-level-security", RuleEntry::off());

        let effective = resolve(&global, &schema, &registry()).unwrap();
        assert_eq!(effective.len(), 1);
        assert_eq!(
            effective.get("row-level-security").unwrap().state,
            RuleState::Off
        );
        assert_eq!(effective.enabled().count(), 0);
    }

    #[test]
    fn unknown_rule_is_rejected_even_when_off() {
        let global = RuleConfigMap::new().with("no-such-rule", RuleEntry::off());

        let err = resolve(&global, &RuleConfigMap::new(), &registry()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule(ref name) if name == "no-such-rule"));
        assert_eq!(err.to_string(), "Unknown rule: \"no-such-rule\"");
    }

    #[test]
    fn empty_configuration_resolves_to_nothing() {
        let effective = resolve(&RuleConfigMap::new(), &RuleConfigMap::new(), &registry()).unwrap();
        assert!(effective.is_empty());
    }
}
