//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe which backend a process uses and where its data lives.
//! - Read the same settings from `HOTEL_*` environment variables.
//!
//! # Invariants
//! - Unknown backend or policy names are rejected, never defaulted.
//! - Defaults: JSON backend, `./data`, lenient guest policy.

use crate::logging::default_log_level;
use crate::model::guest::GuestCreatePolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_BACKEND: &str = "HOTEL_BACKEND";
pub const ENV_DATA_DIR: &str = "HOTEL_DATA_DIR";
pub const ENV_GUEST_POLICY: &str = "HOTEL_GUEST_POLICY";
pub const ENV_LOG_LEVEL: &str = "HOTEL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "HOTEL_LOG_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Storage backend behind every repository of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// One pretty-printed JSON document per collection.
    #[default]
    Json,
    /// One SQLite database with a table per collection.
    Sqlite,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnsupportedBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedBackend(String),
    UnsupportedGuestPolicy(String),
    EmptyDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedBackend(value) => {
                write!(f, "unsupported backend `{value}`; expected json|sqlite")
            }
            Self::UnsupportedGuestPolicy(value) => {
                write!(f, "unsupported guest policy `{value}`; expected lenient|strict")
            }
            Self::EmptyDataDir => write!(f, "data directory cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Backend selection and data location for a `HotelStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    pub guest_policy: GuestCreatePolicy,
}

impl StoreConfig {
    pub fn new(backend: BackendKind, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            data_dir: data_dir.into(),
            guest_policy: GuestCreatePolicy::default(),
        }
    }

    pub fn with_guest_policy(mut self, guest_policy: GuestCreatePolicy) -> Self {
        self.guest_policy = guest_policy;
        self
    }

    /// Reads `HOTEL_BACKEND`, `HOTEL_DATA_DIR` and `HOTEL_GUEST_POLICY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup(ENV_BACKEND) {
            Some(value) => BackendKind::parse(&value)?,
            None => BackendKind::default(),
        };

        let data_dir = match lookup(ENV_DATA_DIR) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDataDir),
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_DATA_DIR),
        };

        let guest_policy = match lookup(ENV_GUEST_POLICY) {
            Some(value) => GuestCreatePolicy::parse(&value)
                .ok_or_else(|| ConfigError::UnsupportedGuestPolicy(value.trim().to_string()))?,
            None => GuestCreatePolicy::default(),
        };

        Ok(Self {
            backend,
            data_dir,
            guest_policy,
        })
    }
}

/// Level and directory handed to `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Reads `HOTEL_LOG_DIR` and `HOTEL_LOG_LEVEL`.
    ///
    /// Returns `None` when no log directory is configured.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let log_dir = lookup(ENV_LOG_DIR).filter(|value| !value.trim().is_empty())?;
        let level = lookup(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        Some(Self {
            level,
            log_dir: PathBuf::from(log_dir.trim()),
        })
    }
}
