pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::{infer_type, CsvLoadUseCase, TableLoader};
pub use domain::config::{Backend, DbConfig};
pub use domain::csv::CsvTable;
pub use domain::error::{AppError, Result};
pub use domain::load::{LoadOptions, LoadReport, RaggedRows};
pub use domain::table::{Column, InferredType, TableSchema};
