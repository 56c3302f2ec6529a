use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::application::CsvLoadUseCase;
use crate::domain::config::Backend;
use crate::domain::error::{AppError, Result};
use crate::domain::load::{LoadOptions, LoadReport, RaggedRows};
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::csv::CsvParser;

/// Load a CSV file into a database table, inferring column types from the
/// first data row.
#[derive(Debug, Parser)]
#[command(name = "tableload", version, about)]
pub struct Cli {
    /// CSV file to load; the table is named after its base name
    #[arg(default_value = "vgsales.csv")]
    pub csv_path: PathBuf,

    /// Table name instead of the file's base name
    #[arg(long)]
    pub table: Option<String>,

    /// Database backend (overrides DB_BACKEND)
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Field delimiter (a single ASCII character)
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Rows whose width differs from the header: reject, pad or skip
    #[arg(long, default_value = "reject")]
    pub ragged: RaggedRows,

    /// TOML file with database settings [default: tableload.toml, if present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the SQL that would run instead of connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Print the load report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(AppError::ValidationError(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )))
        }
    }

    fn config_service(&self) -> ConfigService {
        match &self.config {
            Some(path) => ConfigService::with_file(path),
            None => ConfigService::new(),
        }
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            table_name: self.table.clone(),
            ragged_rows: self.ragged,
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = cli.config_service().load()?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let parser = CsvParser::new().with_delimiter(cli.delimiter_byte()?);
    let use_case = CsvLoadUseCase::new(config, parser, cli.load_options());

    if cli.dry_run {
        print!("{}", use_case.preview(&cli.csv_path)?);
        return Ok(());
    }

    let report = use_case.execute(&cli.csv_path).await?;
    info!(table = %report.table, "Data inserted into '{}' successfully", report.table);
    println!("{}", render_report(&report, cli.json)?);
    Ok(())
}

/// The report as pretty JSON, or a one-line summary
pub fn render_report(report: &LoadReport, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report)
            .map_err(|e| AppError::ValidationError(format!("Failed to encode report: {}", e)));
    }
    Ok(format!(
        "Loaded {} rows into '{}' ({} skipped, {} values nulled) in {} ms",
        report.rows_inserted,
        report.table,
        report.rows_skipped,
        report.nulls_substituted,
        report.elapsed_ms
    ))
}
