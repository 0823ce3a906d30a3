//! Issue aggregation
//!
//! Every issue a rule reports passes through here: ignored issues are
//! dropped, the rest are forwarded to the sink and recorded in the outcome.

use schemalint_core::{Issue, RunOutcome};
use tracing::debug;

use crate::ignore::IgnoreMatchers;

/// Receives each non-ignored issue as soon as it is reported
pub trait IssueSink {
    fn report(&mut self, issue: &Issue);
}

/// Sink that keeps every issue in memory
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub issues: Vec<Issue>,
}

impl IssueSink for CollectingSink {
    fn report(&mut self, issue: &Issue) {
        self.issues.push(issue.clone());
    }
}

/// Accumulates one run's outcome
pub struct ReportAggregator<'a> {
    ignores: &'a IgnoreMatchers,
    sink: &'a mut dyn IssueSink,
    outcome: RunOutcome,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(ignores: &'a IgnoreMatchers, sink: &'a mut dyn IssueSink) -> Self {
        Self {
            ignores,
            sink,
            outcome: RunOutcome::default(),
        }
    }

    /// Drop the issue if ignored, otherwise forward and record it
    pub fn on_report(&mut self, issue: Issue) {
        if self.ignores.is_ignored(&issue.rule, &issue.identifier) {
            debug!(rule = %issue.rule, identifier = %issue.identifier, "Issue ignored");
            return;
        }

        self.sink.report(&issue);
        self.outcome.any_issues = true;
        if let Some(migration) = &issue.suggested_migration {
            self.outcome.suggested_migrations.push(migration.clone());
        }
        self.outcome.issues.push(issue);
    }

    pub fn record_schema(&mut self) {
        self.outcome.schemas_checked += 1;
    }

    pub fn record_rule_run(&mut self) {
        self.outcome.rules_run += 1;
    }

    /// Outcome of everything reported so far
    pub fn finalize(self) -> RunOutcome {
        self.outcome
    }
}
