//! Default paths for dbwatch components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/dbwatch/config.toml` or `~/.config/dbwatch/config.toml`
//! - Logs: `$XDG_STATE_HOME/dbwatch` or `~/.local/state/dbwatch`

use std::path::{Path, PathBuf};

/// Application subdirectory name
const APP_DIR: &str = "dbwatch";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Log filename used when the config does not name one
pub const DEFAULT_LOG_FILENAME: &str = "db_monitor.log";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/dbwatch/config.toml` (via the platform config dir)
/// 2. `/tmp/dbwatch/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
        .join(CONFIG_FILENAME)
}

/// Get the default log directory.
///
/// Order of precedence:
/// 1. `$XDG_STATE_HOME/dbwatch` (if XDG_STATE_HOME is set)
/// 2. `~/.local/state/dbwatch` (fallback)
pub fn default_log_dir() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home).join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".local").join("state").join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("logs")
}

/// Resolve a log file path: absolute paths are kept, relative ones land in `log_dir`.
pub fn resolve_log_path(log_dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        log_dir.join(file)
    }
}
