// ============================================================
// TABLE LOADER USE CASE
// ============================================================
// Create the inferred table, then insert every row in one transaction.
// Create runs in its own transaction and a failure there stops the run
// before any insert. The first failed insert rolls back the whole batch;
// later rows are never sent. Nothing is retried.

use std::path::Path;
use std::time::Instant;

use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;
use sqlx::{AnyConnection, Connection};
use tracing::{debug, error, info, warn};

use crate::application::use_cases::type_inference::{
    float_value, infer_schema, integer_value, is_integer,
};
use crate::domain::csv::CsvTable;
use crate::domain::error::{AppError, Result};
use crate::domain::load::{LoadOptions, LoadReport, RaggedRows};
use crate::domain::table::{InferredType, TableSchema};
use crate::infrastructure::db::{create_table_sql, insert_literal_sql, insert_sql, Dialect};

/// A data row after the shape policy and the integer null policy
#[derive(Debug, PartialEq)]
struct PreparedRow<'a> {
    values: Vec<Option<&'a str>>,
    nulls_substituted: usize,
}

#[derive(Debug, Default)]
struct InsertStats {
    inserted: usize,
    skipped: usize,
    nulls_substituted: usize,
}

pub struct TableLoader {
    dialect: Dialect,
    options: LoadOptions,
}

impl TableLoader {
    pub fn new(dialect: Dialect, options: LoadOptions) -> Self {
        Self { dialect, options }
    }

    /// Table name from the file's base name without extension
    pub fn table_name_for(path: &Path) -> Result<String> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Cannot derive a table name from '{}'",
                    path.display()
                ))
            })
    }

    /// Resolve the table name and infer column types from the first data row
    pub fn plan(&self, default_table_name: &str, table: &CsvTable) -> TableSchema {
        let name = self
            .options
            .table_name
            .as_deref()
            .unwrap_or(default_table_name);
        let schema = infer_schema(name, table);
        debug!(
            table = %schema.name,
            columns = ?schema.columns,
            "Inferred table schema"
        );
        schema
    }

    /// Create the table, then insert all rows. Commits once on success.
    pub async fn load(
        &self,
        conn: &mut AnyConnection,
        schema: &TableSchema,
        table: &CsvTable,
    ) -> Result<LoadReport> {
        let start = Instant::now();

        self.create_table(conn, schema).await?;
        let stats = self.insert_rows(conn, schema, table).await?;

        Ok(LoadReport {
            table: schema.name.clone(),
            columns: schema.columns.clone(),
            rows_inserted: stats.inserted,
            rows_skipped: stats.skipped,
            nulls_substituted: stats.nulls_substituted,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Issue `CREATE TABLE IF NOT EXISTS`; rolls back on failure
    pub async fn create_table(&self, conn: &mut AnyConnection, schema: &TableSchema) -> Result<()> {
        let sql = create_table_sql(self.dialect, schema)?;

        let mut tx = conn.begin().await.map_err(|e| {
            AppError::SchemaError(format!("Failed to begin transaction: {}", e))
        })?;

        if let Err(e) = sqlx::query(&sql).execute(&mut *tx).await {
            error!(table = %schema.name, "Error creating table: {}", e);
            if let Err(rollback_err) = tx.rollback().await {
                warn!(table = %schema.name, "Rollback after failed create also failed: {}", rollback_err);
            }
            return Err(AppError::SchemaError(format!(
                "Failed to create table '{}': {}",
                schema.name, e
            )));
        }

        tx.commit().await.map_err(|e| {
            AppError::SchemaError(format!(
                "Failed to commit creation of table '{}': {}",
                schema.name, e
            ))
        })?;

        info!(table = %schema.name, columns = schema.width(), "Table created (or already present)");
        Ok(())
    }

    async fn insert_rows(
        &self,
        conn: &mut AnyConnection,
        schema: &TableSchema,
        table: &CsvTable,
    ) -> Result<InsertStats> {
        let sql = insert_sql(self.dialect, schema);
        let types = schema.column_types();
        let mut stats = InsertStats::default();

        let mut tx = conn.begin().await.map_err(|e| AppError::RowInsertError {
            row: 0,
            message: format!("Failed to begin transaction: {}", e),
        })?;

        for (idx, row) in table.rows.iter().enumerate() {
            let row_number = idx + 1;

            let outcome = match self.prepare_row(schema, row, row_number) {
                Ok(Some(prepared)) => {
                    let query = bind_row(sqlx::query(&sql), &prepared.values, &types);
                    query
                        .execute(&mut *tx)
                        .await
                        .map(|_| Some(prepared.nulls_substituted))
                        .map_err(|e| AppError::RowInsertError {
                            row: row_number,
                            message: e.to_string(),
                        })
                }
                Ok(None) => Ok(None),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(Some(nulls)) => {
                    stats.inserted += 1;
                    stats.nulls_substituted += nulls;
                }
                Ok(None) => stats.skipped += 1,
                Err(err) => {
                    error!(
                        table = %schema.name,
                        row = row_number,
                        "Error inserting data, rolling back batch: {}",
                        err
                    );
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!(table = %schema.name, "Rollback of insert batch failed: {}", rollback_err);
                    }
                    return Err(err);
                }
            }
        }

        tx.commit().await.map_err(|e| AppError::RowInsertError {
            row: 0,
            message: format!("Failed to commit insert batch: {}", e),
        })?;

        info!(
            table = %schema.name,
            inserted = stats.inserted,
            skipped = stats.skipped,
            nulls = stats.nulls_substituted,
            "Data inserted successfully"
        );
        Ok(stats)
    }

    /// Render the whole load as a SQL script with inlined literals
    pub fn render_script(&self, schema: &TableSchema, table: &CsvTable) -> Result<String> {
        let mut script = create_table_sql(self.dialect, schema)?;
        script.push_str(";\n");

        for (idx, row) in table.rows.iter().enumerate() {
            if let Some(prepared) = self.prepare_row(schema, row, idx + 1)? {
                script.push_str(&insert_literal_sql(self.dialect, schema, &prepared.values));
                script.push_str(";\n");
            }
        }

        Ok(script)
    }

    /// Apply the ragged-row policy, then replace non-integer values in
    /// INTEGER columns with NULL. `Ok(None)` means skip the row.
    fn prepare_row<'a>(
        &self,
        schema: &TableSchema,
        row: &'a [String],
        row_number: usize,
    ) -> Result<Option<PreparedRow<'a>>> {
        let width = schema.width();

        if row.len() != width {
            match self.options.ragged_rows {
                RaggedRows::Reject => {
                    return Err(AppError::RowInsertError {
                        row: row_number,
                        message: format!("expected {} values, found {}", width, row.len()),
                    });
                }
                RaggedRows::Skip => {
                    warn!(
                        table = %schema.name,
                        row = row_number,
                        expected = width,
                        found = row.len(),
                        "Skipping row with wrong number of values"
                    );
                    return Ok(None);
                }
                RaggedRows::Pad => {}
            }
        }

        let mut nulls_substituted = 0;
        let values = schema
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| match row.get(idx) {
                Some(value)
                    if column.data_type == InferredType::Integer && !is_integer(value) =>
                {
                    nulls_substituted += 1;
                    None
                }
                Some(value) => Some(value.as_str()),
                None => None,
            })
            .collect();

        Ok(Some(PreparedRow {
            values,
            nulls_substituted,
        }))
    }
}

fn bind_row<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    values: &[Option<&'q str>],
    types: &[InferredType],
) -> Query<'q, Any, AnyArguments<'q>> {
    for (value, data_type) in values.iter().zip(types) {
        query = match (*value, data_type) {
            (None, InferredType::Integer) => query.bind(None::<i64>),
            (None, InferredType::Float) => query.bind(None::<f64>),
            (None, InferredType::Text) => query.bind(None::<String>),
            // Wider than i64: sent as text, the database converts or rejects it
            (Some(value), InferredType::Integer) => match integer_value(value) {
                Some(number) => query.bind(number),
                None => query.bind(value),
            },
            (Some(value), InferredType::Float) => match float_value(value) {
                Some(number) => query.bind(number),
                None => query.bind(value),
            },
            (Some(value), InferredType::Text) => query.bind(value),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DbConfig;
    use crate::infrastructure::db::connect;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn vgsales_table() -> CsvTable {
        CsvTable::new(
            strings(&["Rank", "Name", "Year", "Global_Sales"]),
            vec![
                strings(&["1", "Wii Sports", "2006", "82.74"]),
                strings(&["2", "Super Mario Bros.", "1985", "40.24"]),
                strings(&["3", "O'Brien's Golf", "N/A", "0.5"]),
            ],
        )
    }

    fn loader(ragged_rows: RaggedRows) -> TableLoader {
        TableLoader::new(
            Dialect::Sqlite,
            LoadOptions {
                table_name: None,
                ragged_rows,
            },
        )
    }

    async fn memory_conn() -> AnyConnection {
        connect(&DbConfig::sqlite_memory()).await.unwrap()
    }

    async fn count_rows(conn: &mut AnyConnection, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", table))
            .fetch_one(conn)
            .await
            .unwrap()
    }

    #[test]
    fn test_table_name_from_path() {
        assert_eq!(
            TableLoader::table_name_for(Path::new("data/vgsales.csv")).unwrap(),
            "vgsales"
        );
        assert_eq!(
            TableLoader::table_name_for(Path::new("archive.tar.csv")).unwrap(),
            "archive.tar"
        );
        assert!(TableLoader::table_name_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_plan_honours_table_override() {
        let table = vgsales_table();
        let default = loader(RaggedRows::Reject).plan("vgsales", &table);
        assert_eq!(default.name, "vgsales");

        let renamed = TableLoader::new(
            Dialect::Sqlite,
            LoadOptions {
                table_name: Some("games".to_string()),
                ..Default::default()
            },
        )
        .plan("vgsales", &table);
        assert_eq!(renamed.name, "games");
        assert_eq!(renamed.column_types(), default.column_types());
    }

    #[test]
    fn test_prepare_row_nulls_bad_integers() {
        let table = vgsales_table();
        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("vgsales", &table);

        let prepared = loader.prepare_row(&schema, &table.rows[2], 3).unwrap().unwrap();
        assert_eq!(
            prepared.values,
            vec![Some("3"), Some("O'Brien's Golf"), None, Some("0.5")]
        );
        assert_eq!(prepared.nulls_substituted, 1);
    }

    #[test]
    fn test_prepare_row_ragged_policies() {
        let table = vgsales_table();
        let short = strings(&["4", "Tetris"]);
        let long = strings(&["5", "Pong", "1972", "1.0", "extra"]);

        let reject = loader(RaggedRows::Reject);
        let schema = reject.plan("vgsales", &table);
        let err = reject.prepare_row(&schema, &short, 4).unwrap_err();
        assert_eq!(err.row(), Some(4));

        let skip = loader(RaggedRows::Skip);
        assert_eq!(skip.prepare_row(&schema, &short, 4).unwrap(), None);

        let pad = loader(RaggedRows::Pad);
        let padded = pad.prepare_row(&schema, &short, 4).unwrap().unwrap();
        assert_eq!(padded.values, vec![Some("4"), Some("Tetris"), None, None]);
        assert_eq!(padded.nulls_substituted, 0);
        let truncated = pad.prepare_row(&schema, &long, 5).unwrap().unwrap();
        assert_eq!(truncated.values.len(), 4);
    }

    #[test]
    fn test_render_script_escapes_and_nulls() {
        let table = vgsales_table();
        let loader = TableLoader::new(Dialect::MySql, LoadOptions::default());
        let schema = loader.plan("vgsales", &table);

        let script = loader.render_script(&schema, &table).unwrap();
        let lines: Vec<_> = script.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "CREATE TABLE IF NOT EXISTS `vgsales` (`Rank` INT, `Name` TEXT, `Year` INT, `Global_Sales` FLOAT);"
        );
        assert_eq!(
            lines[1],
            "INSERT INTO `vgsales` (`Rank`, `Name`, `Year`, `Global_Sales`) VALUES ('1', 'Wii Sports', '2006', '82.74');"
        );
        assert_eq!(
            lines[3],
            "INSERT INTO `vgsales` (`Rank`, `Name`, `Year`, `Global_Sales`) VALUES ('3', 'O''Brien''s Golf', NULL, '0.5');"
        );
    }

    #[tokio::test]
    async fn test_load_inserts_all_rows() {
        let mut conn = memory_conn().await;
        let table = vgsales_table();
        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("vgsales", &table);

        let report = loader.load(&mut conn, &schema, &table).await.unwrap();

        assert_eq!(report.table, "vgsales");
        assert_eq!(report.rows_inserted, 3);
        assert_eq!(report.rows_skipped, 0);
        assert_eq!(report.nulls_substituted, 1);
        assert_eq!(count_rows(&mut conn, "vgsales").await, 3);

        let name: String = sqlx::query_scalar("SELECT \"Name\" FROM \"vgsales\" WHERE \"Rank\" = 3")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(name, "O'Brien's Golf");

        let year: Option<i64> = sqlx::query_scalar("SELECT \"Year\" FROM \"vgsales\" WHERE \"Rank\" = 3")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(year, None);

        let sales: f64 = sqlx::query_scalar("SELECT \"Global_Sales\" FROM \"vgsales\" WHERE \"Rank\" = 1")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert!((sales - 82.74).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rerun_duplicates_rows() {
        let mut conn = memory_conn().await;
        let table = vgsales_table();
        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("vgsales", &table);

        loader.load(&mut conn, &schema, &table).await.unwrap();
        loader.load(&mut conn, &schema, &table).await.unwrap();

        assert_eq!(count_rows(&mut conn, "vgsales").await, 6);
    }

    #[tokio::test]
    async fn test_create_failure_attempts_no_inserts() {
        let mut conn = memory_conn().await;
        let table = CsvTable::new(
            strings(&["id", "id"]),
            vec![strings(&["1", "2"])],
        );
        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("dupes", &table);

        let err = loader.load(&mut conn, &schema, &table).await.unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));

        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'dupes'",
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();
        assert_eq!(exists, 0);
    }

    #[tokio::test]
    async fn test_failed_row_rolls_back_batch() {
        let mut conn = memory_conn().await;
        sqlx::query("CREATE TABLE \"scores\" (\"id\" INTEGER NOT NULL, \"player\" TEXT)")
            .execute(&mut conn)
            .await
            .unwrap();

        let mut rows: Vec<Vec<String>> = (1..=100)
            .map(|i| vec![i.to_string(), format!("player{}", i)])
            .collect();
        // NULL from the integer policy violates NOT NULL on row 5
        rows[4][0] = "N/A".to_string();
        let table = CsvTable::new(strings(&["id", "player"]), rows);

        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("scores", &table);
        let err = loader.load(&mut conn, &schema, &table).await.unwrap_err();

        assert_eq!(err.row(), Some(5));
        assert_eq!(count_rows(&mut conn, "scores").await, 0);
    }

    #[tokio::test]
    async fn test_ragged_row_rejected_rolls_back() {
        let mut conn = memory_conn().await;
        let table = CsvTable::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "x"]), strings(&["2"])],
        );
        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("ragged", &table);

        let err = loader.load(&mut conn, &schema, &table).await.unwrap_err();
        assert_eq!(err.row(), Some(2));
        assert_eq!(count_rows(&mut conn, "ragged").await, 0);
    }

    #[tokio::test]
    async fn test_wide_integer_is_sent_not_nulled() {
        let mut conn = memory_conn().await;
        let table = CsvTable::new(
            strings(&["id"]),
            vec![strings(&["99999999999999999999"]), strings(&["7"])],
        );
        let loader = loader(RaggedRows::Reject);
        let schema = loader.plan("wide", &table);
        assert_eq!(schema.column_types(), vec![InferredType::Integer]);

        let report = loader.load(&mut conn, &schema, &table).await.unwrap();
        assert_eq!(report.rows_inserted, 2);
        assert_eq!(report.nulls_substituted, 0);

        let present: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM \"wide\" WHERE \"id\" IS NOT NULL")
                .fetch_one(&mut conn)
                .await
                .unwrap();
        assert_eq!(present, 2);
    }

    #[tokio::test]
    async fn test_ragged_row_skipped() {
        let mut conn = memory_conn().await;
        let table = CsvTable::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "x"]), strings(&["2"]), strings(&["3", "z"])],
        );
        let loader = loader(RaggedRows::Skip);
        let schema = loader.plan("ragged", &table);

        let report = loader.load(&mut conn, &schema, &table).await.unwrap();
        assert_eq!(report.rows_inserted, 2);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(count_rows(&mut conn, "ragged").await, 2);
    }
}
