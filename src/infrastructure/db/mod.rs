mod connection;
mod dialect;
mod statements;

pub use connection::{close, connect};
pub use dialect::Dialect;
pub use statements::{
    create_table_sql, escape_literal, insert_literal_sql, insert_sql, quote_literal,
};
