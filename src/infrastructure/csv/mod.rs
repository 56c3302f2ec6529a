// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV file reading

mod csv_parser;

pub use csv_parser::CsvParser;
