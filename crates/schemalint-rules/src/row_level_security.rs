//! `row-level-security`: require tables to enable (and optionally force) RLS

use schemalint_core::{Rule, RuleContext, RuleDocs, RuleError};
use serde::Deserialize;

use crate::qualified_name;

#[derive(Debug, Clone, Default, Deserialize)]
struct RlsOptions {
    #[serde(default)]
    enforced: bool,
}

pub struct RowLevelSecurity;

impl RowLevelSecurity {
    pub const NAME: &'static str = "row-level-security";
}

impl Rule for RowLevelSecurity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn docs(&self) -> RuleDocs {
        RuleDocs {
            description: "Require tables to enable or enforce row-level security",
            url: None,
        }
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let options: RlsOptions = ctx.option(0)?.unwrap_or_default();
        let schema = ctx.schema();

        for table in &schema.tables {
            let identifier = format!("{}.{}", schema.name, table.name);
            let qualified = qualified_name(&schema.name, &table.name);

            if !table.is_row_level_security_enabled {
                ctx.report_with_migration(
                    identifier.clone(),
                    "Row-level security is disabled",
                    format!("ALTER TABLE {} ENABLE ROW LEVEL SECURITY;", qualified),
                );
            }
            if options.enforced && !table.is_row_level_security_enforced {
                ctx.report_with_migration(
                    identifier,
                    "Row-level security is not enforced",
                    format!("ALTER TABLE {} FORCE ROW LEVEL SECURITY;", qualified),
                );
            }
        }

        Ok(())
    }
}
