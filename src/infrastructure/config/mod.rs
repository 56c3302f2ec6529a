use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::debug;

use crate::domain::config::DbConfig;
use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "tableload.toml";
pub const ENV_PREFIX: &str = "DB_";

// String fields are read verbatim: figment's Env provider would parse
// DB_PASSWORD=007 as the number 7.
const TEXT_KEYS: &[(&str, &str)] = &[
    ("HOST", "host"),
    ("USER", "user"),
    ("PASSWORD", "password"),
    ("NAME", "database"),
    ("DATABASE", "database"),
];

fn text_field(key: &str) -> Option<&'static str> {
    TEXT_KEYS
        .iter()
        .find(|(env_key, _)| env_key.eq_ignore_ascii_case(key))
        .map(|(_, field)| *field)
}

/// `DB_*` string settings exactly as they appear in the environment
fn raw_text_env() -> BTreeMap<&'static str, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            let prefix = key.get(..ENV_PREFIX.len())?;
            if !prefix.eq_ignore_ascii_case(ENV_PREFIX) {
                return None;
            }
            let field = text_field(&key[ENV_PREFIX.len()..])?;
            Some((field, value.into_string().ok()?))
        })
        .collect()
}

/// Layers database settings: defaults, then the TOML file, then `DB_*`
/// environment variables.
pub struct ConfigService {
    config_file: PathBuf,
    required: bool,
}

impl ConfigService {
    /// Settings from `tableload.toml` when it exists
    pub fn new() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            required: false,
        }
    }

    /// Settings from `path`, which must exist
    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            config_file: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    pub fn figment(&self) -> Figment {
        let env = Env::prefixed(ENV_PREFIX)
            .filter(|key| text_field(key.as_str()).is_none())
            .map(|key| key.as_str().to_lowercase().into());

        Figment::from(Serialized::defaults(DbConfig::default()))
            .merge(Toml::file(&self.config_file))
            .merge(env)
            .merge(Serialized::defaults(raw_text_env()))
    }

    pub fn load(&self) -> Result<DbConfig> {
        if self.required && !self.config_file.is_file() {
            return Err(AppError::ConfigError(format!(
                "Config file '{}' not found",
                self.config_file.display()
            )));
        }

        let config: DbConfig = self.figment().extract().map_err(|e| {
            AppError::ConfigError(format!("Failed to load database configuration: {}", e))
        })?;
        debug!(config = ?config, file = %self.config_file.display(), "Loaded database configuration");
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
