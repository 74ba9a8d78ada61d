//! Checks a dbwatch configuration file and prints the settings it yields.
//!
//! Usage: validate-config [config-file]

use dbwatch_config::{CURRENT_CONFIG_VERSION, ConfigError, Settings, load_config};
use dbwatch_util::{default_config_path, format_duration};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    if !path.is_file() {
        eprintln!("No configuration file at {}", path.display());
        return ExitCode::from(2);
    }

    match load_config(&path) {
        Ok(settings) => {
            println!("{}: OK", path.display());
            print_settings(&settings);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: invalid", path.display());
            print_error(&e);
            ExitCode::from(1)
        }
    }
}

fn print_settings(settings: &Settings) {
    let db = &settings.database;
    let timer = &settings.timer;

    println!("  target          {}:{}/{}", db.server, db.port, db.database);
    println!("  login           {}", db.user.as_deref().unwrap_or("(default)"));
    println!("  connect timeout {}", format_duration(db.connect_timeout));
    println!("  max session     {}", format_duration(timer.max_duration));
    println!("  poll every      {}ms", timer.poll_interval.as_millis());
    for warning in &timer.warnings {
        println!(
            "  warn at -{}     {}",
            format_duration(std::time::Duration::from_secs(warning.seconds_before)),
            warning.message
        );
    }
    println!("  on expiry       {}", timer.completion_message());
    println!("  log file        {}", settings.logging.file.display());
}

fn print_error(err: &ConfigError) {
    match err {
        ConfigError::ValidationFailed { errors } => {
            for e in errors {
                eprintln!("  - {}", e);
            }
        }
        ConfigError::UnsupportedVersion(found) => {
            eprintln!(
                "  config_version {} is not supported (expected {})",
                found, CURRENT_CONFIG_VERSION
            );
        }
        other => eprintln!("  {}", other),
    }
}
