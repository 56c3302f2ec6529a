pub mod use_cases;

pub use use_cases::csv_load::CsvLoadUseCase;
pub use use_cases::table_loader::TableLoader;
pub use use_cases::type_inference::{infer_columns, infer_type};
