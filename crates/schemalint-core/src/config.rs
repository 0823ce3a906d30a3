//! Configuration schema (.schemalintrc.toml)
//!
//! ```toml
//! plugins = []
//!
//! [connection]
//! host = "localhost"
//! database = "app"
//! user = "postgres"
//!
//! [rules]
//! name-inflection = ["error", "singular"]
//! mandatory-columns = ["error", [{ name = "id", expandedType = "pg_catalog.int4" }]]
//!
//! [[schemas]]
//! name = "public"
//!
//! [[ignores]]
//! rule = "name-inflection"
//! identifierPattern = "public\\.audit_.*"
//! ```

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Leading marker of a rule configuration entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleState {
    /// Run the rule; any issue fails the run
    Error,

    /// Do not run the rule
    Off,

    /// Any other marker. Treated like `Off`.
    Other(String),
}

impl RuleState {
    /// Whether the rule should be invoked
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Off => "off",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for RuleState {
    fn from(s: &str) -> Self {
        match s {
            "error" => Self::Error,
            "off" => Self::Off,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule configuration entry: `[state, ...options]`
///
/// Options are passed to the rule verbatim; their shape belongs to the rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub state: RuleState,
    pub options: Vec<Value>,
}

impl RuleEntry {
    pub fn new(state: RuleState, options: Vec<Value>) -> Self {
        Self { state, options }
    }

    /// `["error", ...options]`
    pub fn error(options: Vec<Value>) -> Self {
        Self::new(RuleState::Error, options)
    }

    /// `["off"]`
    pub fn off() -> Self {
        Self::new(RuleState::Off, Vec::new())
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;
        let mut items = items.into_iter();

        let state = match items.next() {
            Some(Value::String(state)) => RuleState::from(state.as_str()),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "rule state must be a string, got {}",
                    other
                )))
            }
            None => {
                return Err(de::Error::invalid_length(
                    0,
                    &"a rule state followed by options",
                ))
            }
        };

        Ok(Self {
            state,
            options: items.collect(),
        })
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(self.state.as_str())?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

/// Rule name -> entry, in document order
///
/// Execution order follows this order, so it is kept explicitly rather than
/// relying on a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfigMap {
    entries: Vec<(String, RuleEntry)>,
}

impl RuleConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, entry: RuleEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((name, entry)),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, entry: RuleEntry) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `overrides` on top of `self`
    ///
    /// Keys of `self` keep their order and take the override's entry when
    /// both sides have them; keys only in `overrides` are appended in their
    /// own order.
    pub fn merge(&self, overrides: &RuleConfigMap) -> RuleConfigMap {
        let mut merged = self.clone();
        for (name, entry) in overrides.iter() {
            merged.insert(name, entry.clone());
        }
        merged
    }
}

impl<'de> Deserialize<'de> for RuleConfigMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleConfigMapVisitor;

        impl<'de> Visitor<'de> for RuleConfigMapVisitor {
            type Value = RuleConfigMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of rule names to [state, ...options]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = RuleConfigMap::new();
                while let Some((name, entry)) = access.next_entry::<String, RuleEntry>()? {
                    map.insert(name, entry);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(RuleConfigMapVisitor)
    }
}

impl Serialize for RuleConfigMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// Declarative suppression of reported issues
///
/// Needs `rule` or `rulePattern`, and `identifier` or `identifierPattern`.
/// When both forms are given the exact one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    #[serde(default, alias = "rule_pattern", skip_serializing_if = "Option::is_none")]
    pub rule_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, alias = "identifier_pattern", skip_serializing_if = "Option::is_none")]
    pub identifier_pattern: Option<String>,
}

impl IgnoreSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_rule_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.rule_pattern = Some(pattern.into());
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_identifier_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.identifier_pattern = Some(pattern.into());
        self
    }
}

impl fmt::Display for IgnoreSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// A schema to lint, with optional rule overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "RuleConfigMap::is_empty")]
    pub rules: RuleConfigMap,
}

impl SchemaConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: RuleConfigMap::new(),
        }
    }

    pub fn with_rules(mut self, rules: RuleConfigMap) -> Self {
        self.rules = rules;
        self
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Full connection string; when set, the other fields are ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub database: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Falls back to `PGPASSWORD` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Connect over TLS
    #[serde(default)]
    pub ssl: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            database: String::new(),
            user: None,
            password: None,
            ssl: false,
        }
    }
}

impl ConnectionConfig {
    /// libpq-style `key=value` connection string
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        let mut parts = vec![
            format!("host={}", quote_conn_value(&self.host)),
            format!("port={}", self.port),
        ];
        if !self.database.is_empty() {
            parts.push(format!("dbname={}", quote_conn_value(&self.database)));
        }
        if let Some(user) = &self.user {
            parts.push(format!("user={}", quote_conn_value(user)));
        }
        if let Some(password) = &self.password {
            parts.push(format!("password={}", quote_conn_value(password)));
        }
        parts.join(" ")
    }

    /// Target description safe for logs (no credentials)
    pub fn describe(&self) -> String {
        if self.url.is_some() {
            return "connection url".to_string();
        }
        format!("{} on {}:{}", self.database, self.host, self.port)
    }
}

fn quote_conn_value(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '\'', '\\']) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Additional rule sources, resolved before the registry is built
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Rules applied to every schema
    #[serde(default)]
    pub rules: RuleConfigMap,

    /// Schemas to lint, in order
    #[serde(default)]
    pub schemas: Vec<SchemaConfig>,

    #[serde(default)]
    pub ignores: Vec<IgnoreSpec>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Names of the configured schemas, in order
    pub fn schema_names(&self) -> Vec<String> {
        self.schemas.iter().map(|s| s.name.clone()).collect()
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown rule: \"{0}\"")]
    UnknownRule(String),

    #[error("Ignore object is missing a rule or rulePattern property: {0}")]
    IgnoreMissingRule(String),

    #[error("Ignore object is missing an identifier or identifierPattern property: {0}")]
    IgnoreMissingIdentifier(String),

    #[error("Invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SAMPLE: &str = r#"
plugins = ["extra"]

[connection]
host = "db.internal"
database = "app"
user = "linter"

[rules]
name-inflection = ["error", "singular"]
mandatory-columns = ["error", [{ name = "id", expandedType = "pg_catalog.int4" }]]
row-level-security = ["off"]

[[schemas]]
name = "public"

[[schemas]]
name = "audit"
[schemas.rules]
name-inflection = ["error", "plural"]
reference-actions = ["error", { onDelete = "CASCADE" }]

[[ignores]]
rule = "name-inflection"
identifier = "public.users"

[[ignores]]
rule_pattern = "^mandatory-"
identifierPattern = "^audit\\."
"#;

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.plugins, vec!["extra".to_string()]);
        assert_eq!(config.connection.host, "db.internal");
        assert_eq!(config.connection.port, 5432);
        assert_eq!(config.schema_names(), vec!["public", "audit"]);

        let keys: Vec<&str> = config.rules.keys().collect();
        assert_eq!(keys, vec!["name-inflection", "mandatory-columns", "row-level-security"]);

        let mandatory = config.rules.get("mandatory-columns").unwrap();
        assert_eq!(mandatory.state, RuleState::Error);
        assert_eq!(
            mandatory.options,
            vec![json!([{ "name": "id", "expandedType": "pg_catalog.int4" }])]
        );
        assert_eq!(config.rules.get("row-level-security").unwrap().state, RuleState::Off);

        assert_eq!(
            config.ignores[1],
            IgnoreSpec::new()
                .with_rule_pattern("^mandatory-")
                .with_identifier_pattern("^audit\\.")
        );
    }

    #[test]
    fn merge_overrides_in_place_and_appends_new_keys() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let merged = config.rules.merge(&config.schemas[1].rules);

        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(
            keys,
            vec!["name-inflection", "mandatory-columns", "row-level-security", "reference-actions"]
        );
        assert_eq!(merged.get("name-inflection").unwrap().options, vec![json!("plural")]);
    }

    #[test]
    fn unrecognized_state_is_not_enabled() {
        let entry: RuleEntry = serde_json::from_value(json!(["warn", 1])).unwrap();
        assert_eq!(entry.state, RuleState::Other("warn".to_string()));
        assert!(!entry.state.is_enabled());
        assert_eq!(entry.options, vec![json!(1)]);
    }

    #[test]
    fn empty_or_non_string_entry_is_rejected() {
        assert!(serde_json::from_value::<RuleEntry>(json!([])).is_err());
        assert!(serde_json::from_value::<RuleEntry>(json!([true])).is_err());
        assert!(serde_json::from_value::<RuleEntry>(json!("error")).is_err());
    }

    #[test]
    fn rule_entry_serializes_as_sequence() {
        let entry = RuleEntry::error(vec![json!("plural")]);
        assert_eq!(serde_json::to_value(&entry).unwrap(), json!(["error", "plural"]));
    }

    #[test]
    fn connection_string_quotes_values() {
        let conn = ConnectionConfig {
            database: "app".to_string(),
            user: Some("linter".to_string()),
            password: Some("it's secret".to_string()),
            ..ConnectionConfig::default()
        };

        assert_eq!(
            conn.connection_string(),
            "host=localhost port=5432 dbname=app user=linter password='it\\'s secret'"
        );
        assert_eq!(conn.describe(), "app on localhost:5432");
    }

    #[test]
    fn config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".schemalintrc.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schemas.len(), 2);

        let missing = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn ignore_spec_display_is_json() {
        let spec = IgnoreSpec::new().with_identifier("public.users");
        assert_eq!(spec.to_string(), r#"{"identifier":"public.users"}"#);
    }
}
