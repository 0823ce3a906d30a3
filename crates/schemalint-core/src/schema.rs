//! Schema snapshot types
//!
//! A snapshot is produced once per run by the extraction layer and is only
//! ever read by rules. Collections keep the order the extractor produced them
//! in, which is what rules iterate over.

use serde::{Deserialize, Serialize};

/// A foreign-key-like relation from a column to another table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReference {
    /// Constraint name (shared by every column of a multi-column reference)
    pub name: String,

    /// Referenced schema
    pub schema_name: String,

    /// Referenced table
    pub table_name: String,

    /// Referenced column
    pub column_name: String,

    /// ON UPDATE action, e.g. `NO ACTION` or `CASCADE`
    pub on_update: String,

    /// ON DELETE action
    pub on_delete: String,
}

impl ColumnReference {
    /// Create a reference with `NO ACTION` for both actions
    pub fn new(
        name: impl Into<String>,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            on_update: "NO ACTION".to_string(),
            on_delete: "NO ACTION".to_string(),
        }
    }

    /// Set the referential actions
    pub fn with_actions(mut self, on_update: impl Into<String>, on_delete: impl Into<String>) -> Self {
        self.on_update = on_update.into();
        self.on_delete = on_delete.into();
        self
    }
}

/// A column of a table or view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name
    pub name: String,

    /// Schema-qualified type name, e.g. `pg_catalog.int4`
    pub expanded_type: String,

    /// Whether the column accepts NULL
    #[serde(default)]
    pub is_nullable: bool,

    /// References this column participates in
    #[serde(default)]
    pub references: Vec<ColumnReference>,
}

impl Column {
    /// Create a nullable column without references
    pub fn new(name: impl Into<String>, expanded_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expanded_type: expanded_type.into(),
            is_nullable: true,
            references: Vec::new(),
        }
    }

    /// Set nullability
    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Add a reference
    pub fn with_reference(mut self, reference: ColumnReference) -> Self {
        self.references.push(reference);
        self
    }
}

/// A table in a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table name
    pub name: String,

    /// Ordered columns
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Row-level security enabled (`relrowsecurity`)
    #[serde(default)]
    pub is_row_level_security_enabled: bool,

    /// Row-level security forced for the owner too (`relforcerowsecurity`)
    #[serde(default)]
    pub is_row_level_security_enforced: bool,
}

impl Table {
    /// Create an empty table with row-level security off
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            is_row_level_security_enabled: false,
            is_row_level_security_enforced: false,
        }
    }

    /// Set the columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Add a column
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Set row-level security flags
    pub fn with_row_level_security(mut self, enabled: bool, enforced: bool) -> Self {
        self.is_row_level_security_enabled = enabled;
        self.is_row_level_security_enforced = enforced;
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A view (plain or materialized) in a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// View name
    pub name: String,

    /// Ordered columns
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }
}

/// Read-only description of one database schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Schema name, e.g. `public`
    pub name: String,

    /// Tables in extraction order
    #[serde(default)]
    pub tables: Vec<Table>,

    /// Views in extraction order
    #[serde(default)]
    pub views: Vec<View>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Add a table
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Add a view
    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Find a table by name
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table and view names, tables first
    pub fn relation_names(&self) -> Vec<&str> {
        self.tables
            .iter()
            .map(|t| t.name.as_str())
            .chain(self.views.iter().map(|v| v.name.as_str()))
            .collect()
    }
}
