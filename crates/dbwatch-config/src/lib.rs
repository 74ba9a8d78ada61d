//! Configuration parsing and validation for dbwatch
//!
//! Built-in defaults describe the whole monitor; a versioned TOML file may
//! override any of them. Validation collects every problem before failing.

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("{} invalid setting(s): {}", .errors.len(), join_errors(.errors))]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Config version {0} is not supported")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The only `config_version` this build understands
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Read, parse and validate the TOML file at `path`
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Parse and validate a TOML document
pub fn parse_config(content: &str) -> ConfigResult<Settings> {
    finish_config(toml::from_str(content)?)
}

/// Read and parse `path` without validating it, so callers can layer
/// overrides on top before [`finish_config`].
///
/// A missing file yields an empty config at the current version. Any other
/// failure (unreadable file, bad TOML) is still an error.
pub fn read_raw_config_or_default(path: impl AsRef<Path>) -> ConfigResult<RawConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(config_path = %path.display(), "No config file, using built-in defaults");
        return Ok(RawConfig {
            config_version: CURRENT_CONFIG_VERSION,
            ..Default::default()
        });
    }
    read_raw_config(path)
}

/// Read and parse `path` without validating it
pub fn read_raw_config(path: impl AsRef<Path>) -> ConfigResult<RawConfig> {
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}

/// Check version and values, then resolve defaults
pub fn finish_config(raw: RawConfig) -> ConfigResult<Settings> {
    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    match validate_config(&raw) {
        errors if errors.is_empty() => Ok(Settings::from_raw(raw)),
        errors => Err(ConfigError::ValidationFailed { errors }),
    }
}
