//! `reference-actions`: require specific ON UPDATE / ON DELETE actions
//!
//! A multi-column reference appears on every column it spans; it is checked
//! once per table, keyed by reference name.

use schemalint_core::{ColumnReference, Rule, RuleContext, RuleDocs, RuleError, Table};
use serde::Deserialize;

use crate::{qualified_name, quote_ident};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedActions {
    #[serde(default)]
    on_update: Option<String>,
    #[serde(default)]
    on_delete: Option<String>,
}

/// A reference as seen from its table, with every column it spans
#[derive(Debug)]
struct TableReference<'a> {
    reference: &'a ColumnReference,
    columns: Vec<&'a str>,
    referenced_columns: Vec<&'a str>,
}

impl TableReference<'_> {
    /// Recreate the constraint with the given actions
    fn migration(&self, schema: &str, table: &str, on_update: &str, on_delete: &str) -> String {
        let name = quote_ident(&self.reference.name);
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {}, ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON UPDATE {} ON DELETE {};",
            qualified_name(schema, table),
            name,
            name,
            quote_list(&self.columns),
            qualified_name(&self.reference.schema_name, &self.reference.table_name),
            quote_list(&self.referenced_columns),
            on_update,
            on_delete
        )
    }
}

fn quote_list(idents: &[&str]) -> String {
    idents.iter().map(|i| quote_ident(i)).collect::<Vec<_>>().join(", ")
}

/// Group column references by name, in first-seen order
fn table_references(table: &Table) -> Vec<TableReference<'_>> {
    let mut grouped: Vec<TableReference<'_>> = Vec::new();

    for column in &table.columns {
        for reference in &column.references {
            match grouped.iter_mut().find(|r| r.reference.name == reference.name) {
                Some(existing) => {
                    existing.columns.push(column.name.as_str());
                    existing.referenced_columns.push(reference.column_name.as_str());
                }
                None => grouped.push(TableReference {
                    reference,
                    columns: vec![column.name.as_str()],
                    referenced_columns: vec![reference.column_name.as_str()],
                }),
            }
        }
    }

    grouped
}

pub struct ReferenceActions;

impl ReferenceActions {
    pub const NAME: &'static str = "reference-actions";
}

impl Rule for ReferenceActions {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn docs(&self) -> RuleDocs {
        RuleDocs {
            description: "Require references to have specific ON DELETE and ON UPDATE actions",
            url: None,
        }
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let expected: ExpectedActions = ctx.option(0)?.unwrap_or_default();
        let schema = ctx.schema();

        for table in &schema.tables {
            for table_ref in table_references(table) {
                let reference = table_ref.reference;
                let identifier = format!("{}.{}.{}", schema.name, table.name, reference.name);
                let mut mismatches = Vec::new();

                if let Some(on_update) = &expected.on_update {
                    if reference.on_update != *on_update {
                        mismatches.push(format!(
                            "Reference action ON UPDATE expected to be \"{}\" but got \"{}\"",
                            on_update, reference.on_update
                        ));
                    }
                }

                if let Some(on_delete) = &expected.on_delete {
                    if reference.on_delete != *on_delete {
                        mismatches.push(format!(
                            "Reference action ON DELETE expected to be \"{}\" but got \"{}\"",
                            on_delete, reference.on_delete
                        ));
                    }
                }

                // One fix per reference, attached to its last issue.
                let last = mismatches.len().saturating_sub(1);
                for (index, message) in mismatches.into_iter().enumerate() {
                    if index == last {
                        let migration = table_ref.migration(
                            &schema.name,
                            &table.name,
                            expected.on_update.as_deref().unwrap_or(&reference.on_update),
                            expected.on_delete.as_deref().unwrap_or(&reference.on_delete),
                        );
                        ctx.report_with_migration(identifier.clone(), message, migration);
                    } else {
                        ctx.report(identifier.clone(), message);
                    }
                }
            }
        }

        Ok(())
    }
}
