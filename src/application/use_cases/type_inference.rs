// ============================================================
// TYPE INFERENCE
// ============================================================
// Each column is classified once, from its value in the first data row:
// INTEGER is an optional `-` then ASCII digits, FLOAT adds `.` and more
// digits, anything else is TEXT. Later rows are never consulted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::csv::CsvTable;
use crate::domain::table::{Column, InferredType, TableSchema};

static INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"));
static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").expect("valid float pattern"));
static INTEGER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer literal pattern"));

/// Classify a single sampled value
pub fn infer_type(value: &str) -> InferredType {
    if INTEGER_PATTERN.is_match(value) {
        InferredType::Integer
    } else if FLOAT_PATTERN.is_match(value) {
        InferredType::Float
    } else {
        InferredType::Text
    }
}

/// Insert-time integer check for INTEGER columns. Looser than inference:
/// surrounding whitespace and a leading `+` are accepted. Magnitude is not
/// checked, so values wider than i64 still count as integers.
pub fn is_integer(value: &str) -> bool {
    INTEGER_LITERAL.is_match(value.trim())
}

/// The value as i64 when it is an integer that fits
pub fn integer_value(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

pub fn float_value(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Pair each header with the type of its first-row value. Headers without a
/// sampled value are TEXT.
pub fn infer_columns(headers: &[String], first_row: &[String]) -> Vec<Column> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let data_type = first_row
                .get(idx)
                .map(|value| infer_type(value))
                .unwrap_or(InferredType::Text);
            Column::new(header.clone(), data_type)
        })
        .collect()
}

pub fn infer_schema(table_name: &str, table: &CsvTable) -> TableSchema {
    let first_row = table.first_row().unwrap_or(&[]);
    TableSchema::new(table_name, infer_columns(&table.headers, first_row))
}
