use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    ConfigError(String),
    ValidationError(String),
    ParseError(String),
    IoError(String),
    ConnectionError(String),
    SchemaError(String),
    /// `row` is the 1-based data row number (the header is not counted),
    /// or 0 when the batch itself failed to begin or commit.
    RowInsertError { row: usize, message: String },
}

impl AppError {
    /// Data row that caused the failure, if the error is tied to one.
    pub fn row(&self) -> Option<usize> {
        match self {
            AppError::RowInsertError { row, .. } => Some(*row),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            AppError::SchemaError(msg) => write!(f, "Schema error: {}", msg),
            AppError::RowInsertError { row, message } => {
                write!(f, "Row insert error at row {}: {}", row, message)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
