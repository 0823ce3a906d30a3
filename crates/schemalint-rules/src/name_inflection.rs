//! `name-inflection`: enforce singular or plural table and view names
//!
//! Only the last word of a name is inspected, so `UserAccount`,
//! `user_account` and `user-account` all classify as singular.

use std::fmt;

use schemalint_core::{Rule, RuleContext, RuleDocs, RuleError};
use serde::Deserialize;

/// Grammatical number of a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inflection {
    Singular,
    Plural,
}

impl fmt::Display for Inflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singular => write!(f, "singular"),
            Self::Plural => write!(f, "plural"),
        }
    }
}

/// Singular -> plural pairs that do not follow the trailing-`s` rule
///
/// Covers the common English irregulars, not every loanword; anything missing
/// falls through to the trailing-`s` check.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("addendum", "addenda"),
    ("alga", "algae"),
    ("alumna", "alumnae"),
    ("alumnus", "alumni"),
    ("alveolus", "alveoli"),
    ("amoeba", "amoebae"),
    ("analysis", "analyses"),
    ("antenna", "antennae"),
    ("antithesis", "antitheses"),
    ("apex", "apices"),
    ("appendix", "appendices"),
    ("automaton", "automata"),
    ("axis", "axes"),
    ("bacillus", "bacilli"),
    ("bacterium", "bacteria"),
    ("basis", "bases"),
    ("beau", "beaux"),
    ("cactus", "cacti"),
    ("calf", "calves"),
    ("cherub", "cherubim"),
    ("child", "children"),
    ("codex", "codices"),
    ("concerto", "concerti"),
    ("corpus", "corpora"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("curriculum", "curricula"),
    ("datum", "data"),
    ("diagnosis", "diagnoses"),
    ("die", "dice"),
    ("echo", "echoes"),
    ("elf", "elves"),
    ("ellipsis", "ellipses"),
    ("embargo", "embargoes"),
    ("emphasis", "emphases"),
    ("erratum", "errata"),
    ("formula", "formulae"),
    ("focus", "foci"),
    ("foot", "feet"),
    ("fungus", "fungi"),
    ("genus", "genera"),
    ("goose", "geese"),
    ("graffito", "graffiti"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("hoof", "hooves"),
    ("hypothesis", "hypotheses"),
    ("index", "indices"),
    ("knife", "knives"),
    ("larva", "larvae"),
    ("leaf", "leaves"),
    ("libretto", "libretti"),
    ("life", "lives"),
    ("loaf", "loaves"),
    ("locus", "loci"),
    ("louse", "lice"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("medium", "media"),
    ("memorandum", "memoranda"),
    ("millennium", "millennia"),
    ("minutia", "minutiae"),
    ("mouse", "mice"),
    ("nebula", "nebulae"),
    ("nemesis", "nemeses"),
    ("neurosis", "neuroses"),
    ("nucleus", "nuclei"),
    ("oasis", "oases"),
    ("opus", "opera"),
    ("ovum", "ova"),
    ("ox", "oxen"),
    ("paralysis", "paralyses"),
    ("parenthesis", "parentheses"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("phylum", "phyla"),
    ("polyhedron", "polyhedra"),
    ("potato", "potatoes"),
    ("prognosis", "prognoses"),
    ("quiz", "quizzes"),
    ("radius", "radii"),
    ("referendum", "referenda"),
    ("scarf", "scarves"),
    ("self", "selves"),
    ("shelf", "shelves"),
    ("stimulus", "stimuli"),
    ("stratum", "strata"),
    ("syllabus", "syllabi"),
    ("symposium", "symposia"),
    ("synopsis", "synopses"),
    ("synthesis", "syntheses"),
    ("thesis", "theses"),
    ("thief", "thieves"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("vertebra", "vertebrae"),
    ("vertex", "vertices"),
    ("veto", "vetoes"),
    ("vita", "vitae"),
    ("vortex", "vortices"),
    ("wharf", "wharves"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

/// Nouns whose singular and plural are the same word
const INVARIANT_NOUNS: &[&str] = &[
    "aircraft", "barracks", "bison", "buffalo", "carp", "chassis", "cod", "deer", "elk", "fish",
    "gallows", "grouse", "hovercraft", "means", "moose", "news", "offspring", "pike", "salmon",
    "series", "sheep", "shrimp", "spacecraft", "species", "swine", "trout", "tuna",
    "watercraft",
];

fn is_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// Split before every ASCII uppercase letter, `-` and `_`
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in name.chars() {
        if (ch.is_ascii_uppercase() || is_separator(ch)) && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .into_iter()
        .map(|w| w.trim_matches(is_separator).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Classify a name by its last word; `None` when it cannot be told
pub fn detect_inflection(name: &str) -> Option<Inflection> {
    let last_word = split_words(name).pop()?.to_lowercase();

    if INVARIANT_NOUNS.contains(&last_word.as_str()) {
        return None;
    }
    if IRREGULAR_PLURALS.iter().any(|(singular, _)| *singular == last_word) {
        return Some(Inflection::Singular);
    }
    if IRREGULAR_PLURALS.iter().any(|(_, plural)| *plural == last_word) {
        return Some(Inflection::Plural);
    }

    // Words like address or kiss end in a double s and are singular.
    if last_word.ends_with('s') && !last_word.ends_with("ss") {
        Some(Inflection::Plural)
    } else {
        Some(Inflection::Singular)
    }
}

pub struct NameInflection;

impl NameInflection {
    pub const NAME: &'static str = "name-inflection";
}

impl Rule for NameInflection {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn docs(&self) -> RuleDocs {
        RuleDocs {
            description: "Enforce singular or plural naming of tables and views",
            url: Some("https://github.com/kristiandupont/schemalint/tree/master/src/rules#name-inflection"),
        }
    }

    fn process(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let expected: Inflection = ctx.option(0)?.unwrap_or(Inflection::Singular);
        let schema = ctx.schema();

        let names = schema
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .chain(schema.views.iter().map(|v| v.name.as_str()));

        for name in names {
            match detect_inflection(name) {
                Some(actual) if actual != expected => ctx.report(
                    format!("{}.{}", schema.name, name),
                    format!(
                        "Expected {} names, but '{}' seems to be {}",
                        expected, name, actual
                    ),
                ),
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pairs, run_rule};
    use pretty_assertions::assert_eq;
    use schemalint_core::{SchemaSnapshot, Table, View};
    use serde_json::json;

    #[test]
    fn detects_regular_words() {
        assert_eq!(detect_inflection("user"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("users"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("address"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("addresses"), Some(Inflection::Plural));
    }

    #[test]
    fn uses_last_word_of_compound_names() {
        assert_eq!(detect_inflection("UserAccount"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("usersAccounts"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("users_account"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("user-accounts_"), Some(Inflection::Plural));
    }

    #[test]
    fn knows_irregular_and_invariant_words() {
        assert_eq!(detect_inflection("person"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("people"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("analysis"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("order_Children"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("sheep"), None);
        assert_eq!(detect_inflection("time_series"), None);
        assert_eq!(detect_inflection("__"), None);
    }

    #[test]
    fn latin_and_greek_plurals() {
        assert_eq!(detect_inflection("dice"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("die"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("larvae"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("test_criteria"), Some(Inflection::Plural));
        assert_eq!(detect_inflection("Millennium"), Some(Inflection::Singular));
        assert_eq!(detect_inflection("shrimp"), None);
        assert_eq!(detect_inflection("news"), None);
    }

    #[test]
    fn defaults_to_singular() {
        let schema = SchemaSnapshot::new("public")
            .with_table(Table::new("user"))
            .with_table(Table::new("orders"))
            .with_view(View::new("active_users"))
            .with_view(View::new("fish"));

        let issues = run_rule(&NameInflection, &schema, &[]).unwrap();
        assert_eq!(
            pairs(&issues),
            vec![
                ("public.orders", "Expected singular names, but 'orders' seems to be plural"),
                (
                    "public.active_users",
                    "Expected singular names, but 'active_users' seems to be plural"
                ),
            ]
        );
    }

    #[test]
    fn plural_option() {
        let schema = SchemaSnapshot::new("public")
            .with_table(Table::new("user"))
            .with_table(Table::new("orders"));

        let issues = run_rule(&NameInflection, &schema, &[json!("plural")]).unwrap();
        assert_eq!(
            pairs(&issues),
            vec![("public.user", "Expected plural names, but 'user' seems to be singular")]
        );
    }

    #[test]
    fn unknown_option_fails() {
        let schema = SchemaSnapshot::new("public");
        let err = run_rule(&NameInflection, &schema, &[json!("dual")]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidOptions { .. }));
    }
}
