//! Core configuration with environment overrides.
//!
//! # Invariants
//! - Defaults are usable without any environment variables.
//! - Invalid override values are rejected, never silently ignored.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "resume.sqlite3";
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

pub const ENV_DB_PATH: &str = "RESUME_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "RESUME_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RESUME_LOG_DIR";
pub const ENV_MAX_DOCUMENT_MB: &str = "RESUME_MAX_DOCUMENT_MB";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                message,
            } => write!(f, "invalid value `{value}` for {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing every collection.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    /// Upper bound for a single source document.
    pub max_document_bytes: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `RESUME_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values returned from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = present(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path.trim());
        }

        if let Some(level) = present(ENV_LOG_LEVEL) {
            config.log_level =
                normalize_level(&level).map_err(|message| ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    value: level.clone(),
                    message,
                })?;
        }

        if let Some(dir) = present(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }

        if let Some(megabytes) = present(ENV_MAX_DOCUMENT_MB) {
            config.max_document_bytes = parse_megabytes(&megabytes)?;
        }

        Ok(config)
    }
}

fn parse_megabytes(value: &str) -> ConfigResult<usize> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        key: ENV_MAX_DOCUMENT_MB,
        value: value.to_string(),
        message: message.to_string(),
    };
    let megabytes: usize = value
        .trim()
        .parse()
        .map_err(|_| invalid("expected a whole number of megabytes"))?;
    if megabytes == 0 {
        return Err(invalid("must be greater than zero"));
    }
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| invalid("value is too large"))
}
