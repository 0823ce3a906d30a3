//! Built-in schemalint rules
//!
//! Each rule is a unit struct implementing [`Rule`]. [`builtin_rules`] is the
//! base rule source every registry starts from; plugins may shadow these by
//! registering a rule with the same name.

mod mandatory_columns;
mod name_inflection;
mod reference_actions;
mod row_level_security;

#[cfg(test)]
mod test_support;

use schemalint_core::RuleSource;

pub use mandatory_columns::MandatoryColumns;
pub use name_inflection::{detect_inflection, Inflection, NameInflection};
pub use reference_actions::ReferenceActions;
pub use row_level_security::RowLevelSecurity;

/// All built-in rules
pub fn builtin_rules() -> RuleSource {
    RuleSource::new()
        .with_rule(MandatoryColumns)
        .with_rule(NameInflection)
        .with_rule(ReferenceActions)
        .with_rule(RowLevelSecurity)
}

/// `"schema"."name"` for use in suggested migrations
pub(crate) fn qualified_name(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
