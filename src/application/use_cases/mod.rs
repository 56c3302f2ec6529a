pub mod csv_load;
pub mod table_loader;
pub mod type_inference;
