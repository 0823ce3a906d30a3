//! `mandatory-columns`: require every table to have certain columns
//!
//! ```toml
//! mandatory-columns = ["error", [
//!     { name = "id", expandedType = "pg_catalog.int4" },
//!     { name = "created_at", expandedType = "pg_catalog.timestamptz" },
//! ]]
//! ```

use schemalint_core::{Rule, RuleContext, RuleDocs, RuleError};
use serde::Deserialize;

use crate::{qualified_name, quote_ident};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedColumn {
    name: String,
    expanded_type: String,
}

pub struct MandatoryColumns;

impl MandatoryColumns {
    pub const NAME: &'static str = "mandatory-columns";
}

impl Rule for MandatoryColumns {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn docs(&self) -> RuleDocs {
        RuleDocs {
            description: "Require tables to have specific columns",
            url: None,
        }
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let expected: Vec<ExpectedColumn> = ctx.option(0)?.unwrap_or_default();
        let schema = ctx.schema();

        for table in &schema.tables {
            for column in &expected {
                match table.find_column(&column.name) {
                    None => ctx.report_with_migration(
                        format!("{}.{}", schema.name, table.name),
                        format!(
                            "Column \"{}\" of type \"{}\" is missing",
                            column.name, column.expanded_type
                        ),
                        format!(
                            "ALTER TABLE {} ADD COLUMN {} {};",
                            qualified_name(&schema.name, &table.name),
                            quote_ident(&column.name),
                            column.expanded_type
                        ),
                    ),
                    Some(actual) if actual.expanded_type != column.expanded_type => ctx.report(
                        format!("{}.{}.{}", schema.name, table.name, actual.name),
                        format!(
                            "Column \"{}\" is of type \"{}\" but expected \"{}\"",
                            actual.name, actual.expanded_type, column.expanded_type
                        ),
                    ),
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}
