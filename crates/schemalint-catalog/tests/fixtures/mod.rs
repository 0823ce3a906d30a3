//! Test fixtures for extractor integration tests
//!
//! Snapshots shaped like what the PostgreSQL extractor returns for a small
//! application database.

#![allow(dead_code)]

use schemalint_core::{Column, ColumnReference, SchemaSnapshot, Table, View};

/// `public` schema with users, orders and a reporting view
pub fn public_schema() -> SchemaSnapshot {
    SchemaSnapshot::new("public")
        .with_table(
            Table::new("users")
                .with_columns(vec![
                    Column::new("id", "pg_catalog.int4"),
                    Column::new("email", "pg_catalog.text"),
                    Column::new("deleted_at", "pg_catalog.timestamptz").with_nullable(true),
                ])
                .with_row_level_security(true, false),
        )
        .with_table(Table::new("orders").with_columns(vec![
            Column::new("id", "pg_catalog.int4"),
            Column::new("user_id", "pg_catalog.int4").with_reference(
                ColumnReference::new("orders_user_id_fkey", "public", "users", "id")
                    .with_actions("CASCADE", "RESTRICT"),
            ),
        ]))
        .with_view(View::new("order_totals").with_columns(vec![
            Column::new("user_id", "pg_catalog.int4"),
            Column::new("total", "pg_catalog.numeric").with_nullable(true),
        ]))
}

/// Schema with nothing in it
pub fn empty_schema(name: &str) -> SchemaSnapshot {
    SchemaSnapshot::new(name)
}
