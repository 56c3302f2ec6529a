pub mod config;
pub mod error;
pub mod load;
pub mod table;

// CSV content module
pub mod csv;
