use crate::domain::config::Backend;
use crate::domain::table::InferredType;

/// SQL flavour of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
}

impl From<Backend> for Dialect {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Mysql => Dialect::MySql,
            Backend::Postgres => Dialect::Postgres,
            Backend::Sqlite => Dialect::Sqlite,
        }
    }
}

impl Dialect {
    fn identifier_quote(&self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        }
    }

    /// Quote an identifier, doubling any embedded quote character
    pub fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(quote);
        for ch in name.chars() {
            if ch == quote {
                quoted.push(quote);
            }
            quoted.push(ch);
        }
        quoted.push(quote);
        quoted
    }

    pub fn type_name(&self, data_type: InferredType) -> &'static str {
        match (self, data_type) {
            (Dialect::MySql, InferredType::Integer) => "INT",
            (Dialect::MySql, InferredType::Float) => "FLOAT",
            (Dialect::Postgres, InferredType::Integer) => "BIGINT",
            (Dialect::Postgres, InferredType::Float) => "DOUBLE PRECISION",
            (Dialect::Sqlite, InferredType::Integer) => "INTEGER",
            (Dialect::Sqlite, InferredType::Float) => "REAL",
            (_, InferredType::Text) => "TEXT",
        }
    }

    /// Bind placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }
}
