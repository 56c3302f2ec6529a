// ============================================================
// CSV PARSER
// ============================================================
// Read a header record and all data records into a CsvTable

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::domain::csv::CsvTable;
use crate::domain::error::{AppError, Result};

/// CSV reader settings
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse a UTF-8 CSV file
    pub fn parse_file(&self, path: &Path) -> Result<CsvTable> {
        let mut file = File::open(path).map_err(|e| {
            AppError::IoError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to read {} as UTF-8: {}",
                path.display(),
                e
            ))
        })?;

        let table = self.parse_content(&content)?;
        debug!(
            path = %path.display(),
            columns = table.headers.len(),
            rows = table.len(),
            "Parsed CSV file"
        );
        Ok(table)
    }

    /// Parse CSV content from string. Requires a header and at least one
    /// data row.
    pub fn parse_content(&self, content: &str) -> Result<CsvTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .trim(Trim::None)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let headers = match records.next() {
            Some(record) => Self::to_values(&record.map_err(|e| {
                AppError::ParseError(format!("Failed to read CSV headers: {}", e))
            })?),
            None => return Err(AppError::ParseError("CSV file is empty".to_string())),
        };

        let mut rows = Vec::new();
        for (index, result) in records.enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(Self::to_values(&record));
        }

        if rows.is_empty() {
            return Err(AppError::ParseError(
                "CSV file has a header but no data rows".to_string(),
            ));
        }

        Ok(CsvTable::new(headers, rows))
    }

    fn to_values(record: &StringRecord) -> Vec<String> {
        record.iter().map(str::to_string).collect()
    }
}
