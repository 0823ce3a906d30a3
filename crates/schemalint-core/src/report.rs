//! Issues, run outcome and the JSON report (stable v1)
//!
//! The report schema is versioned. Breaking changes require a new version.

use serde::{Deserialize, Serialize};

/// A single problem reported by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Name of the reporting rule
    pub rule: String,

    /// Schema the rule was running against
    pub schema: String,

    /// Dotted path: `schema`, `schema.table`, `schema.table.column` or
    /// `schema.table.constraint`
    pub identifier: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_migration: Option<String>,
}

impl Issue {
    pub fn new(
        rule: impl Into<String>,
        schema: impl Into<String>,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            schema: schema.into(),
            identifier: identifier.into(),
            message: message.into(),
            suggested_migration: None,
        }
    }

    pub fn with_suggested_migration(mut self, migration: impl Into<String>) -> Self {
        self.suggested_migration = Some(migration.into());
        self
    }
}

/// Result of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// At least one issue survived the ignore filter
    pub any_issues: bool,

    /// Suggested migrations, in report order
    pub suggested_migrations: Vec<String>,

    /// Non-ignored issues, in report order
    pub issues: Vec<Issue>,

    /// Schemas evaluated
    pub schemas_checked: usize,

    /// Rule invocations performed
    pub rules_run: usize,
}

impl RunOutcome {
    /// Process-level status: 0 when clean, 1 otherwise
    pub fn status(&self) -> i32 {
        if self.any_issues {
            1
        } else {
            0
        }
    }
}

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of non-ignored issues
    pub total: usize,

    pub schemas_checked: usize,

    pub rules_run: usize,
}

/// Lint report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub version: ReportVersion,

    /// Timestamp (RFC 3339)
    pub timestamp: String,

    pub summary: ReportSummary,

    pub issues: Vec<Issue>,

    pub suggested_migrations: Vec<String>,
}

impl Report {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary {
                total: outcome.issues.len(),
                schemas_checked: outcome.schemas_checked,
                rules_run: outcome.rules_run,
            },
            issues: outcome.issues.clone(),
            suggested_migrations: outcome.suggested_migrations.clone(),
        }
    }

    /// Whether the report fails the run
    pub fn has_issues(&self) -> bool {
        self.summary.total > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_status() {
        let mut outcome = RunOutcome::default();
        assert_eq!(outcome.status(), 0);

        outcome.any_issues = true;
        assert_eq!(outcome.status(), 1);
    }

    #[test]
    fn report_from_outcome() {
        let outcome = RunOutcome {
            any_issues: true,
            suggested_migrations: vec!["ALTER TABLE users ADD COLUMN id int4;".to_string()],
            issues: vec![Issue::new(
                "mandatory-columns",
                "public",
                "public.users",
                "Column \"id\" of type \"pg_catalog.int4\" is missing",
            )],
            schemas_checked: 1,
            rules_run: 3,
        };

        let report = Report::from_outcome(&outcome);
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.rules_run, 3);
        assert!(report.has_issues());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"suggested_migrations\""));
        assert!(json.contains("\"identifier\": \"public.users\""));
    }

    #[test]
    fn suggested_migration_is_omitted_when_absent() {
        let issue = Issue::new("r", "public", "public", "m");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("suggestedMigration"));
    }
}
