//! Validated settings structures

use crate::schema::{
    RawConfig, RawDatabaseConfig, RawLoggingConfig, RawNotificationConfig, RawTimerConfig,
    RawWarningThreshold,
};
use dbwatch_api::WarningThreshold;
use dbwatch_util::DEFAULT_LOG_FILENAME;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DATABASE: &str = "train_test";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_WARNING_SECONDS: u64 = 5 * 60;
pub const DEFAULT_NOTIFICATION_TITLE: &str = "Database Monitor";
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_APP_NAME: &str = "dbwatch";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Validated settings ready for use by the daemon
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub timer: TimerSettings,
    pub notifications: NotificationSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            database: DatabaseSettings::from_raw(raw.database),
            timer: TimerSettings::from_raw(raw.timer),
            notifications: NotificationSettings::from_raw(raw.notifications),
            logging: LoggingSettings::from_raw(raw.logging),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(RawConfig {
            config_version: crate::CURRENT_CONFIG_VERSION,
            ..Default::default()
        })
    }
}

/// Connection to the watched database
#[derive(Clone)]
pub struct DatabaseSettings {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
}

impl DatabaseSettings {
    fn from_raw(raw: RawDatabaseConfig) -> Self {
        Self {
            server: raw.server.unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            port: raw.port.unwrap_or(DEFAULT_PORT),
            database: raw.database.unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            user: raw.user,
            password: raw.password,
            connect_timeout: raw
                .connect_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Session timer settings
#[derive(Debug, Clone)]
pub struct TimerSettings {
    pub max_duration: Duration,
    pub poll_interval: Duration,
    pub warnings: Vec<WarningThreshold>,
}

impl TimerSettings {
    fn from_raw(raw: RawTimerConfig) -> Self {
        let warnings = raw
            .warnings
            .map(|w| w.into_iter().map(convert_warning).collect())
            .unwrap_or_else(default_warning_thresholds);

        Self {
            max_duration: raw
                .max_duration_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_MAX_DURATION),
            poll_interval: raw
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            warnings,
        }
    }

    /// Notification text for a session that ran its full length
    pub fn completion_message(&self) -> String {
        format!("Time's up! {} completed.", describe_span(self.max_duration.as_secs()))
    }
}

/// Desktop notification settings
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub title: String,
    pub timeout: Duration,
    pub app_name: String,
}

impl NotificationSettings {
    fn from_raw(raw: RawNotificationConfig) -> Self {
        Self {
            title: raw
                .title
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_TITLE.to_string()),
            timeout: raw
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT),
            app_name: raw.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub file: PathBuf,
    pub level: String,
    pub json: bool,
}

impl LoggingSettings {
    fn from_raw(raw: RawLoggingConfig) -> Self {
        Self {
            file: raw
                .file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILENAME)),
            level: raw.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            json: raw.json,
        }
    }
}

fn convert_warning(raw: RawWarningThreshold) -> WarningThreshold {
    let message = raw
        .message
        .unwrap_or_else(|| default_warning_message(raw.seconds_before));
    WarningThreshold::new(raw.seconds_before, message)
}

/// Default warning: 5 minutes before expiry
pub fn default_warning_thresholds() -> Vec<WarningThreshold> {
    vec![WarningThreshold::new(
        DEFAULT_WARNING_SECONDS,
        default_warning_message(DEFAULT_WARNING_SECONDS),
    )]
}

/// "5 minutes remaining!", "1 minute remaining!", "90 seconds remaining!"
pub fn default_warning_message(seconds_before: u64) -> String {
    format!("{} remaining!", describe_span(seconds_before))
}

fn describe_span(secs: u64) -> String {
    match (secs % 60, secs / 60) {
        (0, 1) => "1 minute".to_string(),
        (0, minutes) if minutes > 0 => format!("{} minutes", minutes),
        (_, _) if secs == 1 => "1 second".to_string(),
        _ => format!("{} seconds", secs),
    }
}
