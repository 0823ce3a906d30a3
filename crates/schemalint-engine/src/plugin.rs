//! Plugin resolution
//!
//! Configuration lists plugins by reference string. A resolver turns each
//! reference into a [`RuleSource`]; rules are linked in ahead of time, so the
//! resolver is a lookup table supplied by the embedding program.

use std::collections::HashMap;

use schemalint_core::RuleSource;

use crate::error::EngineError;

/// Turns a configured plugin reference into the rules it contributes
pub trait PluginResolver {
    /// Fails with [`EngineError::UnknownPlugin`] when `reference` is not known
    fn resolve(&self, reference: &str) -> Result<RuleSource, EngineError>;
}

/// Resolver over a fixed set of named rule sources
#[derive(Debug, Clone, Default)]
pub struct StaticPluginResolver {
    plugins: HashMap<String, RuleSource>,
}

impl StaticPluginResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, reference: impl Into<String>, source: RuleSource) -> Self {
        self.register(reference, source);
        self
    }

    /// Add or replace the source behind `reference`
    pub fn register(&mut self, reference: impl Into<String>, source: RuleSource) {
        self.plugins.insert(reference.into(), source);
    }
}

impl PluginResolver for StaticPluginResolver {
    fn resolve(&self, reference: &str) -> Result<RuleSource, EngineError> {
        self.plugins
            .get(reference)
            .cloned()
            .ok_or_else(|| EngineError::UnknownPlugin(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_reference() {
        let resolver =
            StaticPluginResolver::new().with_plugin("builtins-again", schemalint_rules::builtin_rules());

        let source = resolver.resolve("builtins-again").unwrap();
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn unknown_reference_fails() {
        let err = StaticPluginResolver::new().resolve("./missing-plugin").unwrap_err();
        assert!(matches!(err, EngineError::UnknownPlugin(ref r) if r == "./missing-plugin"));
        assert_eq!(err.to_string(), "Unknown plugin: \"./missing-plugin\"");
    }
}
