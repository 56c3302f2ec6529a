// ============================================================
// LOAD OPTIONS AND REPORT
// ============================================================

use serde::{Deserialize, Serialize};

use super::error::AppError;
use super::table::Column;

/// What to do with a data row whose width differs from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaggedRows {
    /// Fail the row, which aborts and rolls back the batch
    #[default]
    Reject,
    /// Pad short rows with NULL, truncate long rows
    Pad,
    /// Leave the row out and keep going
    Skip,
}

impl std::str::FromStr for RaggedRows {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, AppError> {
        match value.to_ascii_lowercase().as_str() {
            "reject" => Ok(RaggedRows::Reject),
            "pad" => Ok(RaggedRows::Pad),
            "skip" => Ok(RaggedRows::Skip),
            other => Err(AppError::ValidationError(format!(
                "Unknown ragged row policy '{}', expected reject, pad or skip",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Overrides the table name derived from the file stem
    pub table_name: Option<String>,
    pub ragged_rows: RaggedRows,
}

/// Outcome of a committed load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub table: String,
    pub columns: Vec<Column>,
    pub rows_inserted: usize,
    pub rows_skipped: usize,
    /// INTEGER cells replaced by NULL because they did not parse
    pub nulls_substituted: usize,
    pub elapsed_ms: u64,
}
