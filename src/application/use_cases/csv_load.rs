// ============================================================
// CSV LOAD USE CASE
// ============================================================
// Read a CSV file, connect, create the table, insert rows, close

use std::path::Path;

use tracing::{error, info, warn};

use crate::application::use_cases::table_loader::TableLoader;
use crate::domain::config::DbConfig;
use crate::domain::error::Result;
use crate::domain::load::{LoadOptions, LoadReport};
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::db::{self, Dialect};

pub struct CsvLoadUseCase {
    config: DbConfig,
    parser: CsvParser,
    loader: TableLoader,
}

impl CsvLoadUseCase {
    pub fn new(config: DbConfig, parser: CsvParser, options: LoadOptions) -> Self {
        let loader = TableLoader::new(Dialect::from(config.backend), options);
        Self {
            config,
            parser,
            loader,
        }
    }

    /// Load `csv_path` into the configured database. The CSV is read before
    /// connecting so a bad file never opens a connection.
    pub async fn execute(&self, csv_path: &Path) -> Result<LoadReport> {
        let table = self.parser.parse_file(csv_path)?;
        let default_name = TableLoader::table_name_for(csv_path)?;
        let schema = self.loader.plan(&default_name, &table);

        let ragged = table.ragged_rows();
        if let Some((first_row, width)) = ragged.first() {
            warn!(
                count = ragged.len(),
                first_row,
                width,
                expected = table.headers.len(),
                "CSV has rows whose width differs from the header"
            );
        }

        let mut conn = db::connect(&self.config).await?;
        let result = self.loader.load(&mut conn, &schema, &table).await;
        db::close(conn).await;

        match &result {
            Ok(report) => info!(
                table = %report.table,
                rows = report.rows_inserted,
                elapsed_ms = report.elapsed_ms,
                "Load complete"
            ),
            Err(err) => error!(table = %schema.name, "Load aborted: {}", err),
        }
        result
    }

    /// SQL script for `csv_path` without touching the database
    pub fn preview(&self, csv_path: &Path) -> Result<String> {
        let table = self.parser.parse_file(csv_path)?;
        let default_name = TableLoader::table_name_for(csv_path)?;
        let schema = self.loader.plan(&default_name, &table);
        self.loader.render_script(&schema, &table)
    }
}
