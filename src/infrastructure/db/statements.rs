//! SQL text for the create-table and insert statements.

use crate::domain::error::{AppError, Result};
use crate::domain::table::TableSchema;

use super::dialect::Dialect;

/// `CREATE TABLE IF NOT EXISTS` for the schema, columns in header order
pub fn create_table_sql(dialect: Dialect, schema: &TableSchema) -> Result<String> {
    validate_identifiers(schema)?;

    let column_defs = schema
        .columns
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                dialect.quote_identifier(&column.name),
                dialect.type_name(column.data_type)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        dialect.quote_identifier(&schema.name),
        column_defs
    ))
}

fn column_list(dialect: Dialect, schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|column| dialect.quote_identifier(&column.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parameterized insert with one placeholder per column
pub fn insert_sql(dialect: Dialect, schema: &TableSchema) -> String {
    let placeholders = (1..=schema.width())
        .map(|idx| dialect.placeholder(idx))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_identifier(&schema.name),
        column_list(dialect, schema),
        placeholders
    )
}

/// Insert with values inlined as literals. Only used to render scripts;
/// execution goes through [`insert_sql`] and bound parameters.
pub fn insert_literal_sql(dialect: Dialect, schema: &TableSchema, values: &[Option<&str>]) -> String {
    let literals = values
        .iter()
        .map(|value| match value {
            Some(value) => quote_literal(value),
            None => "NULL".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_identifier(&schema.name),
        column_list(dialect, schema),
        literals
    )
}

/// Single-quoted string literal with embedded quotes doubled
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}

pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

fn validate_identifiers(schema: &TableSchema) -> Result<()> {
    if schema.name.trim().is_empty() {
        return Err(AppError::SchemaError("table name is empty".to_string()));
    }
    if schema.columns.is_empty() {
        return Err(AppError::SchemaError(format!(
            "table '{}' has no columns",
            schema.name
        )));
    }
    if let Some(position) = schema.columns.iter().position(|c| c.name.trim().is_empty()) {
        return Err(AppError::SchemaError(format!(
            "column {} of table '{}' has an empty header",
            position + 1,
            schema.name
        )));
    }
    Ok(())
}
