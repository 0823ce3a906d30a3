//! Ignore matching
//!
//! Each [`IgnoreSpec`] compiles into one matcher for the rule name and one
//! for the issue identifier. An issue is suppressed when any matcher accepts
//! both. Patterns are unanchored regular expressions: `^users` must be
//! written explicitly to match only at the start.

use regex::Regex;
use schemalint_core::{ConfigError, IgnoreSpec};

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Pattern(Regex),
}

impl Matcher {
    /// Exact value first, then pattern; empty strings count as absent
    fn compile(exact: Option<&str>, pattern: Option<&str>) -> Result<Option<Self>, ConfigError> {
        if let Some(value) = exact.filter(|v| !v.is_empty()) {
            return Ok(Some(Self::Exact(value.to_string())));
        }

        match pattern.filter(|p| !p.is_empty()) {
            Some(pattern) => Regex::new(pattern)
                .map(|regex| Some(Self::Pattern(regex)))
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == value,
            Self::Pattern(regex) => regex.is_match(value),
        }
    }
}

/// One compiled ignore specification
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    rule: Matcher,
    identifier: Matcher,
}

impl IgnoreMatcher {
    pub fn compile(spec: &IgnoreSpec) -> Result<Self, ConfigError> {
        let rule = Matcher::compile(spec.rule.as_deref(), spec.rule_pattern.as_deref())?
            .ok_or_else(|| ConfigError::IgnoreMissingRule(spec.to_string()))?;
        let identifier =
            Matcher::compile(spec.identifier.as_deref(), spec.identifier_pattern.as_deref())?
                .ok_or_else(|| ConfigError::IgnoreMissingIdentifier(spec.to_string()))?;

        Ok(Self { rule, identifier })
    }

    /// Both the rule name and the identifier match
    pub fn matches(&self, rule: &str, identifier: &str) -> bool {
        self.rule.matches(rule) && self.identifier.matches(identifier)
    }
}

/// All ignore matchers of a run
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatchers {
    matchers: Vec<IgnoreMatcher>,
}

impl IgnoreMatchers {
    /// Compile every spec; the first malformed one fails the whole set
    pub fn compile(specs: &[IgnoreSpec]) -> Result<Self, ConfigError> {
        let matchers = specs
            .iter()
            .map(IgnoreMatcher::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { matchers })
    }

    /// Any matcher accepts the pair
    pub fn is_ignored(&self, rule: &str, identifier: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(rule, identifier))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
