//! The rule contract
//!
//! A rule is a named, stateless check over one [`SchemaSnapshot`]. It reads
//! the snapshot, interprets its own options and reports issues through the
//! [`RuleContext`]. Anything a rule builds while processing is local to that
//! call.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::report::Issue;
use crate::schema::SchemaSnapshot;

/// Informational metadata about a rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleDocs {
    pub description: &'static str,
    pub url: Option<&'static str>,
}

/// Errors raised by a rule body. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid options for rule \"{rule}\": {message}")]
    InvalidOptions { rule: String, message: String },

    #[error("Rule \"{rule}\" failed: {message}")]
    Failed { rule: String, message: String },
}

/// A pluggable lint rule
pub trait Rule: Send + Sync {
    /// Globally unique name, e.g. `mandatory-columns`
    fn name(&self) -> &str;

    fn docs(&self) -> RuleDocs {
        RuleDocs::default()
    }

    /// Check the context's schema and report any issues found
    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError>;
}

/// What a rule sees while processing one schema
pub struct RuleContext<'a> {
    rule: &'a str,
    schema: &'a SchemaSnapshot,
    options: &'a [Value],
    reporter: &'a mut dyn FnMut(Issue),
}

impl<'a> RuleContext<'a> {
    /// `reporter` receives every issue, stamped with `rule` and the schema name
    pub fn new(
        rule: &'a str,
        schema: &'a SchemaSnapshot,
        options: &'a [Value],
        reporter: &'a mut dyn FnMut(Issue),
    ) -> Self {
        Self {
            rule,
            schema,
            options,
            reporter,
        }
    }

    pub fn rule(&self) -> &str {
        self.rule
    }

    pub fn schema(&self) -> &'a SchemaSnapshot {
        self.schema
    }

    /// Everything after the state marker of the rule's config entry
    pub fn options(&self) -> &'a [Value] {
        self.options
    }

    /// Deserialize the option at `index`; `None` when absent or null
    pub fn option<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, RuleError> {
        match self.options.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| self.invalid_options(e.to_string())),
        }
    }

    /// Build an [`RuleError::InvalidOptions`] for this rule
    pub fn invalid_options(&self, message: impl Into<String>) -> RuleError {
        RuleError::InvalidOptions {
            rule: self.rule.to_string(),
            message: message.into(),
        }
    }

    pub fn report(&mut self, identifier: impl Into<String>, message: impl Into<String>) {
        let issue = Issue::new(self.rule, &self.schema.name, identifier, message);
        (self.reporter)(issue);
    }

    pub fn report_with_migration(
        &mut self,
        identifier: impl Into<String>,
        message: impl Into<String>,
        suggested_migration: impl Into<String>,
    ) {
        let issue = Issue::new(self.rule, &self.schema.name, identifier, message)
            .with_suggested_migration(suggested_migration);
        (self.reporter)(issue);
    }
}

/// An ordered set of rules contributed by one source (built-ins or a plugin)
#[derive(Clone, Default)]
pub struct RuleSource {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSource").field("rules", &self.names()).finish()
    }
}
