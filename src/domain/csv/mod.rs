// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Parsed CSV content as plain values
// No I/O, no async, no external dependencies

mod csv_table;

pub use csv_table::CsvTable;
