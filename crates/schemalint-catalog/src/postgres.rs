//! PostgreSQL extractor using pg_catalog
//!
//! Reads tables, views, columns, foreign keys and row-level security flags for
//! each requested schema. Works with PostgreSQL 10+ (partitioned tables are
//! reported as tables, materialized views as views).
//!
//! ## Usage
//!
//! ```rust,ignore
//! // From the run configuration
//! let extractor = PostgresExtractor::connect(&config.connection).await?;
//!
//! // Using a connection string
//! let extractor = PostgresExtractor::from_connection_string(
//!     "host=localhost port=5432 dbname=mydb user=postgres password=secret"
//! ).await?;
//! ```
//!
//! Reference: https://www.postgresql.org/docs/current/catalogs.html

use std::collections::HashMap;

use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use schemalint_core::{Column, ColumnReference, ConnectionConfig, SchemaSnapshot, Table, View};
use tokio_postgres::{Client, Config as PgConfig, NoTls};

use crate::adapter::{FetchError, SchemaExtractor, SchemaSnapshots};

const RELATIONS_QUERY: &str = r#"
    SELECT c.oid, c.relname, c.relkind::text, c.relrowsecurity, c.relforcerowsecurity
    FROM pg_catalog.pg_class c
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = $1
      AND c.relkind IN ('r', 'p', 'v', 'm')
    ORDER BY c.relname
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT a.attrelid, a.attname, tn.nspname || '.' || t.typname, NOT a.attnotnull
    FROM pg_catalog.pg_attribute a
    JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
    JOIN pg_catalog.pg_namespace tn ON tn.oid = t.typnamespace
    WHERE n.nspname = $1
      AND c.relkind IN ('r', 'p', 'v', 'm')
      AND a.attnum > 0
      AND NOT a.attisdropped
    ORDER BY a.attrelid, a.attnum
"#;

const REFERENCES_QUERY: &str = r#"
    SELECT con.conrelid, a.attname, con.conname, fn.nspname, fc.relname, fa.attname,
           con.confupdtype::text, con.confdeltype::text
    FROM pg_catalog.pg_constraint con
    JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_class fc ON fc.oid = con.confrelid
    JOIN pg_catalog.pg_namespace fn ON fn.oid = fc.relnamespace
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(attnum, fattnum, ord)
    JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
    JOIN pg_catalog.pg_attribute fa ON fa.attrelid = con.confrelid AND fa.attnum = k.fattnum
    WHERE con.contype = 'f'
      AND n.nspname = $1
    ORDER BY con.conrelid, con.conname, k.ord
"#;

/// PostgreSQL schema extractor
pub struct PostgresExtractor {
    client: Client,

    /// Connection host
    host: String,

    /// Connection port
    port: u16,

    /// Database name
    database: String,
}

impl PostgresExtractor {
    /// Connect using the run configuration's connection settings
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, FetchError> {
        let conn_str = config.connection_string();
        if config.ssl {
            Self::from_connection_string_with_tls(&conn_str).await
        } else {
            Self::from_connection_string(&conn_str).await
        }
    }

    /// Create extractor from a PostgreSQL connection string
    ///
    /// Supports the standard `host=localhost port=5432 dbname=mydb user=postgres`
    /// format as well as `postgresql://` URLs.
    pub async fn from_connection_string(conn_str: &str) -> Result<Self, FetchError> {
        let (host, port, database) = Self::describe_target(conn_str)?;

        let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .map_err(|e| {
                FetchError::ConnectionError(format!(
                    "Failed to connect to PostgreSQL at {}:{}: {}",
                    host, port, e
                ))
            })?;

        // Spawn connection handler in background
        let host_clone = host.clone();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(host = %host_clone, port, "PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
        })
    }

    /// Create extractor from a PostgreSQL connection string over TLS
    ///
    /// The `sslmode` setting is ignored; TLS is always used.
    pub async fn from_connection_string_with_tls(conn_str: &str) -> Result<Self, FetchError> {
        let (host, port, database) = Self::describe_target(conn_str)?;

        let connector = TlsConnector::builder().build().map_err(|e| {
            FetchError::ConfigError(format!("Failed to create TLS connector: {}", e))
        })?;
        let tls = MakeTlsConnector::new(connector);

        let (client, connection) = tokio_postgres::connect(conn_str, tls)
            .await
            .map_err(|e| {
                FetchError::ConnectionError(format!(
                    "Failed to connect to PostgreSQL at {}:{} with TLS: {}",
                    host, port, e
                ))
            })?;

        let host_clone = host.clone();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(host = %host_clone, port, "PostgreSQL TLS connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
        })
    }

    /// Host, port and database of a connection string, for logging
    fn describe_target(conn_str: &str) -> Result<(String, u16, String), FetchError> {
        let config: PgConfig = conn_str
            .parse()
            .map_err(|e| FetchError::ConfigError(format!("Invalid connection string: {}", e)))?;

        let host = config
            .get_hosts()
            .first()
            .map(|h| match h {
                tokio_postgres::config::Host::Tcp(name) => name.clone(),
                #[cfg(unix)]
                tokio_postgres::config::Host::Unix(path) => path.display().to_string(),
            })
            .unwrap_or_else(|| "localhost".to_string());
        let port = config.get_ports().first().copied().unwrap_or(5432);
        let database = config.get_dbname().unwrap_or("postgres").to_string();

        Ok((host, port, database))
    }

    /// Map a `confupdtype` / `confdeltype` code to its SQL spelling
    pub fn reference_action(code: &str) -> Option<&'static str> {
        match code {
            "a" => Some("NO ACTION"),
            "r" => Some("RESTRICT"),
            "c" => Some("CASCADE"),
            "n" => Some("SET NULL"),
            "d" => Some("SET DEFAULT"),
            _ => None,
        }
    }

    fn action(code: &str) -> Result<String, FetchError> {
        Self::reference_action(code)
            .map(str::to_string)
            .ok_or_else(|| {
                FetchError::InvalidResponse(format!("Unknown referential action code '{}'", code))
            })
    }

    fn query_error(e: tokio_postgres::Error) -> FetchError {
        let err_str = e.to_string();
        if err_str.contains("permission denied") {
            FetchError::PermissionDenied(err_str)
        } else {
            FetchError::QueryError(err_str)
        }
    }

    /// Extract a single schema
    async fn extract_schema(&self, schema_name: &str) -> Result<SchemaSnapshot, FetchError> {
        let relations = self
            .client
            .query(RELATIONS_QUERY, &[&schema_name])
            .await
            .map_err(Self::query_error)?;

        let mut columns_by_relation: HashMap<u32, Vec<Column>> = HashMap::new();
        for row in self
            .client
            .query(COLUMNS_QUERY, &[&schema_name])
            .await
            .map_err(Self::query_error)?
        {
            let relid: u32 = row.get(0);
            let name: String = row.get(1);
            let expanded_type: String = row.get(2);
            let is_nullable: bool = row.get(3);

            columns_by_relation
                .entry(relid)
                .or_default()
                .push(Column::new(name, expanded_type).with_nullable(is_nullable));
        }

        for row in self
            .client
            .query(REFERENCES_QUERY, &[&schema_name])
            .await
            .map_err(Self::query_error)?
        {
            let relid: u32 = row.get(0);
            let column_name: String = row.get(1);
            let constraint_name: String = row.get(2);
            let foreign_schema: String = row.get(3);
            let foreign_table: String = row.get(4);
            let foreign_column: String = row.get(5);
            let on_update: String = row.get(6);
            let on_delete: String = row.get(7);

            let reference = ColumnReference::new(
                constraint_name,
                foreign_schema,
                foreign_table,
                foreign_column,
            )
            .with_actions(Self::action(&on_update)?, Self::action(&on_delete)?);

            let column = columns_by_relation
                .get_mut(&relid)
                .and_then(|cols| cols.iter_mut().find(|c| c.name == column_name))
                .ok_or_else(|| {
                    FetchError::InvalidResponse(format!(
                        "Reference {} points at unknown column {}",
                        reference.name, column_name
                    ))
                })?;
            column.references.push(reference);
        }

        let mut snapshot = SchemaSnapshot::new(schema_name);
        for row in relations {
            let relid: u32 = row.get(0);
            let name: String = row.get(1);
            let kind: String = row.get(2);
            let rls_enabled: bool = row.get(3);
            let rls_enforced: bool = row.get(4);
            let columns = columns_by_relation.remove(&relid).unwrap_or_default();

            match kind.as_str() {
                "r" | "p" => snapshot.tables.push(
                    Table::new(name)
                        .with_columns(columns)
                        .with_row_level_security(rls_enabled, rls_enforced),
                ),
                _ => snapshot.views.push(View::new(name).with_columns(columns)),
            }
        }

        tracing::debug!(
            schema = schema_name,
            tables = snapshot.tables.len(),
            views = snapshot.views.len(),
            "Extracted schema"
        );

        Ok(snapshot)
    }

    /// Get the connection host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the connection port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the database name
    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait::async_trait]
impl SchemaExtractor for PostgresExtractor {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn extract_schemas(&self, schemas: &[String]) -> Result<SchemaSnapshots, FetchError> {
        let mut snapshots = SchemaSnapshots::new();
        for name in schemas {
            let snapshot = self.extract_schema(name).await?;
            snapshots.insert(name.clone(), snapshot);
        }
        Ok(snapshots)
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        self.client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| FetchError::QueryError(format!("Connection test failed: {}", e)))?;
        Ok(())
    }
}
