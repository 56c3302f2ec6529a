// ============================================================
// CSV TABLE
// ============================================================
// Header plus data rows as read from a CSV file

use serde::{Deserialize, Serialize};

/// Parsed CSV content. `rows` starts with the first data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// The row used for type inference
    pub fn first_row(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose width differs from the header, as (1-based row, width)
    pub fn ragged_rows(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != self.headers.len())
            .map(|(idx, row)| (idx + 1, row.len()))
            .collect()
    }
}
