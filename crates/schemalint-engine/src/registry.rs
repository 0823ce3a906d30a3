//! Rule registry
//!
//! Maps rule names to implementations. Sources are applied in order, so a
//! plugin rule registered under a built-in name replaces the built-in.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schemalint_core::{Rule, RuleSource};
use tracing::debug;

/// Rule implementations keyed by [`Rule::name`]
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Merge the given sources; later sources win on name clashes
    pub fn build(sources: impl IntoIterator<Item = RuleSource>) -> Self {
        let mut rules: HashMap<String, Arc<dyn Rule>> = HashMap::new();

        for source in sources {
            for rule in source.iter() {
                if rules.insert(rule.name().to_string(), Arc::clone(rule)).is_some() {
                    debug!(rule = rule.name(), "Rule replaced by a later source");
                }
            }
        }

        Self { rules }
    }

    /// Implementation registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(name)
    }

    /// Whether any source registered `name`
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct rule names
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no source contributed a rule
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
