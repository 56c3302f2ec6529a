// ============================================================
// TABLE SCHEMA TYPES
// ============================================================
// Columns and their inferred types

use serde::{Deserialize, Serialize};

/// Column type inferred from a sampled value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InferredType {
    Integer,
    Float,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: InferredType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: InferredType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Target table: name plus columns in header order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn column_types(&self) -> Vec<InferredType> {
        self.columns.iter().map(|c| c.data_type).collect()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}
