//! Console output for issues and suggested migrations

use colored::Colorize;
use schemalint_core::{Issue, RunOutcome};
use schemalint_engine::IssueSink;

/// Prints each issue to stderr as it is reported
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    reported: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl IssueSink for ConsoleReporter {
    fn report(&mut self, issue: &Issue) {
        eprintln!("{}", format_issue(issue));
        self.reported += 1;
    }
}

/// `<identifier>: error <rule> : <message>`
pub fn format_issue(issue: &Issue) -> String {
    format!(
        "{}: error {} : {}",
        issue.identifier.yellow(),
        issue.rule.red(),
        issue.message
    )
}

/// Closing block printed after a run
pub fn summary_lines(outcome: &RunOutcome) -> Vec<String> {
    if !outcome.any_issues {
        return vec!["No issues detected".green().to_string()];
    }
    if outcome.suggested_migrations.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![String::new(), "Suggested fix".bold().to_string()];
    lines.extend(outcome.suggested_migrations.iter().cloned());
    lines
}
