use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::progress::UNBOUNDED_CAP;

/// Main configuration structure for tallyboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Progress counter behaviour
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Acting subject defaults
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".tallyboard/tallyboard.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files. Logs go to stderr only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Progress counter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProgressConfig {
    /// Whether the single-statement atomic increment is installed. When
    /// false every increment goes through the read-modify-write fallback.
    #[serde(default = "default_atomic_procedure")]
    pub atomic_procedure: bool,

    /// Cap used for goals without a weekly target
    #[serde(default = "default_unbounded_cap")]
    pub unbounded_cap: u32,
}

const fn default_atomic_procedure() -> bool {
    true
}

const fn default_unbounded_cap() -> u32 {
    UNBOUNDED_CAP
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            atomic_procedure: default_atomic_procedure(),
            unbounded_cap: default_unbounded_cap(),
        }
    }
}

/// Identity configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentityConfig {
    /// Subject acting when no `--subject` flag is given
    #[serde(default)]
    pub subject_id: Option<Uuid>,
}
