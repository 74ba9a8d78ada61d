//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Target database connection
    #[serde(default)]
    pub database: RawDatabaseConfig,

    /// Session timer settings
    #[serde(default)]
    pub timer: RawTimerConfig,

    /// Desktop notification settings
    #[serde(default)]
    pub notifications: RawNotificationConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: RawLoggingConfig,
}

/// Database connection settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDatabaseConfig {
    /// Database server host name
    pub server: Option<String>,

    /// Server port (default: 5432)
    pub port: Option<u16>,

    /// Database whose sessions are watched
    pub database: Option<String>,

    /// Login used by the monitor itself
    pub user: Option<String>,

    /// Password for `user`
    pub password: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_seconds: Option<u64>,
}

/// Session timer settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTimerConfig {
    /// Maximum usage session length in seconds
    pub max_duration_seconds: Option<u64>,

    /// Poll cadence in milliseconds
    pub poll_interval_ms: Option<u64>,

    /// Warning thresholds (default: one warning 5 minutes before expiry)
    pub warnings: Option<Vec<RawWarningThreshold>>,
}

/// Warning threshold
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawWarningThreshold {
    /// Seconds before expiry
    pub seconds_before: u64,

    /// Notification text; derived from `seconds_before` when omitted
    pub message: Option<String>,
}

/// Desktop notification settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawNotificationConfig {
    /// Notification title
    pub title: Option<String>,

    /// How long a notification stays on screen, in seconds
    pub timeout_seconds: Option<u64>,

    /// Application name reported to the notification server
    pub app_name: Option<String>,
}

/// Log output settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLoggingConfig {
    /// Log file; relative paths resolve under the log directory
    pub file: Option<PathBuf>,

    /// Default filter directive (e.g. "debug", "dbwatch=info")
    pub level: Option<String>,

    /// Write the log file as JSON lines
    #[serde(default)]
    pub json: bool,
}
