// ============================================================
// DATABASE CONFIGURATION
// ============================================================
// Connection parameters for the target database

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{AppError, Result};

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// MySQL and MariaDB
    #[default]
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Backend::Mysql => Some(3306),
            Backend::Postgres => Some(5432),
            Backend::Sqlite => None,
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            Backend::Mysql => "mysql",
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl std::str::FromStr for Backend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Backend::Mysql),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(AppError::ConfigError(format!("Unknown backend '{}'", other))),
        }
    }
}

/// Connection settings. For SQLite, `database` is the file path
/// (or `:memory:`) and the network fields are ignored.
#[derive(Clone, Serialize, Deserialize)]
pub struct DbConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            host: "localhost".to_string(),
            port: None,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DbConfig {
    /// Configuration for an in-memory SQLite database
    pub fn sqlite_memory() -> Self {
        Self {
            backend: Backend::Sqlite,
            database: ":memory:".to_string(),
            ..Default::default()
        }
    }

    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| self.backend.default_port())
    }

    /// Validate required fields for the selected backend
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(AppError::ConfigError(
                "database name is required (DB_NAME)".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "connect_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.backend == Backend::Sqlite {
            return Ok(());
        }
        if self.host.trim().is_empty() {
            return Err(AppError::ConfigError("host is required (DB_HOST)".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(AppError::ConfigError("user is required (DB_USER)".to_string()));
        }
        Ok(())
    }

    /// Build a connection URL with percent-encoded credentials
    pub fn connection_url(&self) -> Result<String> {
        self.validate()?;

        if self.backend == Backend::Sqlite {
            if self.database == ":memory:" {
                return Ok("sqlite::memory:".to_string());
            }
            let path = self.database.replace('\\', "/");
            return Ok(format!("sqlite://{}?mode=rwc", path));
        }

        let mut url = url::Url::parse(&format!("{}://localhost", self.backend.scheme()))
            .map_err(|e| AppError::ConfigError(format!("Failed to build URL: {}", e)))?;
        url.set_host(Some(self.host.trim()))
            .map_err(|e| AppError::ConfigError(format!("Invalid host '{}': {}", self.host, e)))?;
        url.set_port(self.effective_port())
            .map_err(|_| AppError::ConfigError("Failed to set port".to_string()))?;
        url.set_username(&self.user)
            .map_err(|_| AppError::ConfigError("Failed to set user".to_string()))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| AppError::ConfigError("Failed to set password".to_string()))?;
        }
        url.set_path(&self.database);

        Ok(url.to_string())
    }
}
