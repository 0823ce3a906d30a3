//! Test fixtures for engine integration tests
//!
//! Snapshots model a small application database; the extra rules make rule
//! invocation observable from the outside.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use schemalint_core::{
    Column, ColumnReference, Rule, RuleContext, RuleError, SchemaSnapshot, Table, View,
};

/// `public` schema: `users` has no `id`, `orders` references `users`
/// through a two-column key
pub fn public_schema() -> SchemaSnapshot {
    let fkey = ColumnReference::new("orders_user_id_fkey", "public", "users", "user_id")
        .with_actions("NO ACTION", "CASCADE");

    SchemaSnapshot::new("public")
        .with_table(
            Table::new("users")
                .with_columns(vec![
                    Column::new("user_id", "pg_catalog.int4"),
                    Column::new("tenant_id", "pg_catalog.int4"),
                    Column::new("email", "pg_catalog.text"),
                ])
                .with_row_level_security(true, true),
        )
        .with_table(
            Table::new("orders")
                .with_columns(vec![
                    Column::new("id", "pg_catalog.int4"),
                    Column::new("user_id", "pg_catalog.int4").with_reference(fkey.clone()),
                    Column::new("tenant_id", "pg_catalog.int4").with_reference(fkey),
                ])
                .with_row_level_security(true, true),
        )
        .with_view(View::new("active_users"))
}

/// `audit` schema: a single table without row-level security
pub fn audit_schema() -> SchemaSnapshot {
    SchemaSnapshot::new("audit").with_table(
        Table::new("log_entry").with_columns(vec![
            Column::new("id", "pg_catalog.int8"),
            Column::new("payload", "pg_catalog.jsonb").with_nullable(true),
        ]),
    )
}

pub const MANDATORY_ID: &str = r#"
[rules]
mandatory-columns = ["error", [{ name = "id", expandedType = "pg_catalog.int4" }]]

[[schemas]]
name = "public"
"#;

/// Counts its invocations and reports nothing
#[derive(Clone, Default)]
pub struct CountingRule {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

impl CountingRule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Rule for CountingRule {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, _ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Reports the schema itself with a fixed message
pub struct SchemaMarker {
    pub name: &'static str,
    pub message: &'static str,
}

impl Rule for SchemaMarker {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let schema = ctx.schema().name.clone();
        ctx.report(schema, self.message);
        Ok(())
    }
}

/// Always fails
pub struct BrokenRule;

impl Rule for BrokenRule {
    fn name(&self) -> &str {
        "broken"
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        Err(RuleError::Failed {
            rule: ctx.rule().to_string(),
            message: "cannot evaluate".to_string(),
        })
    }
}
