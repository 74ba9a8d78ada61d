//! dbwatchd - The dbwatch service
//!
//! This is the main entry point for the dbwatch service.
//! It wires together all the components:
//! - Configuration loading
//! - Logging (console + file)
//! - PostgreSQL activity probe
//! - Desktop notifier
//! - Session timer and console display

mod display;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use dbwatch_config::{
    RawConfig, Settings, finish_config, read_raw_config, read_raw_config_or_default,
};
use dbwatch_core::{Monitor, Poller, TickOutcome, TimerPlan};
use dbwatch_host_api::ActivityProbe;
use dbwatch_host_linux::detect_notifier;
use dbwatch_probe::PostgresProbe;
use dbwatch_util::{MonotonicInstant, default_config_path, default_log_dir, format_duration};
use display::{ConsoleDisplay, DisplayFormat};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// dbwatchd - Times database usage sessions and warns before they run out
#[derive(Parser, Debug)]
#[command(name = "dbwatchd")]
#[command(about = "Times database usage sessions and warns before they run out", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/dbwatch/config.toml)
    #[arg(short, long, env = "DBWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Database server host override
    #[arg(short, long)]
    server: Option<String>,

    /// Database server port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Watched database override
    #[arg(short, long)]
    database: Option<String>,

    /// Login used by the monitor
    #[arg(short, long)]
    user: Option<String>,

    /// Password for the monitor login
    #[arg(long, env = "DBWATCH_DB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log directory override
    #[arg(long, env = "DBWATCH_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (default from config, "debug" if unset)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Do not print the display to stdout
    #[arg(long)]
    no_display: bool,

    /// How the display is printed
    #[arg(long, value_enum, default_value_t = DisplayFormat::Text)]
    display_format: DisplayFormat,

    /// Poll once, print the display and exit
    #[arg(long)]
    once: bool,
}

impl Args {
    /// Config file (or built-in defaults) with command-line overrides on top,
    /// validated as a whole.
    fn load_settings(&self) -> Result<Settings> {
        let mut raw = match &self.config {
            Some(path) => read_raw_config(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => {
                let path = default_config_path();
                read_raw_config_or_default(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?
            }
        };

        self.apply_overrides(&mut raw);

        finish_config(raw).context("Invalid settings")
    }

    fn apply_overrides(&self, raw: &mut RawConfig) {
        let db = &mut raw.database;
        if let Some(server) = &self.server {
            db.server = Some(server.clone());
        }
        if let Some(port) = self.port {
            db.port = Some(port);
        }
        if let Some(database) = &self.database {
            db.database = Some(database.clone());
        }
        if let Some(user) = &self.user {
            db.user = Some(user.clone());
        }
        if let Some(password) = &self.password {
            db.password = Some(password.clone());
        }
        if let Some(level) = &self.log_level {
            raw.logging.level = Some(level.clone());
        }
    }
}

/// Main service state
struct Service {
    settings: Settings,
    monitor: Monitor,
    poller: Poller,
    display: Option<ConsoleDisplay>,
}

impl Service {
    fn new(settings: Settings, display: Option<ConsoleDisplay>) -> Self {
        let probe: Arc<dyn ActivityProbe> = Arc::new(PostgresProbe::new(&settings.database));
        let notifier = detect_notifier(&settings.notifications);
        let poller = Poller::new(probe, notifier, settings.notifications.title.clone());

        info!(
            target_db = %poller.probe().describe(),
            notifier = poller.notifier().backend(),
            "Capabilities initialized"
        );

        let monitor = Monitor::new(
            TimerPlan::from_settings(&settings.timer),
            settings.database.server.clone(),
            settings.database.database.clone(),
        );

        Self {
            settings,
            monitor,
            poller,
            display,
        }
    }

    async fn tick(&mut self) {
        let outcome = self
            .poller
            .tick(&mut self.monitor, MonotonicInstant::now(), dbwatch_util::now())
            .await;

        if let TickOutcome::Polled { signal, events } = &outcome {
            debug!(active = signal.active, events = events.len(), "Poll complete");
        }

        if let Some(display) = &mut self.display {
            display.render(self.monitor.display());
        }
    }

    async fn run(mut self) -> Result<()> {
        // Set up signal handlers
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sighup =
            signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

        // A tick is never re-armed before the previous one finished
        let mut tick_timer = tokio::time::interval(self.settings.timer.poll_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_ms = self.settings.timer.poll_interval.as_millis() as u64,
            max_duration = %format_duration(self.monitor.session().plan().max_duration),
            "Service running"
        );

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }
                _ = sighup.recv() => {
                    info!("Received SIGHUP, shutting down gracefully");
                    break;
                }

                _ = tick_timer.tick() => {
                    self.tick().await;
                }
            }
        }

        if let Some(running) = self.monitor.session().running() {
            info!(
                session_id = %running.session_id,
                program = %running.program,
                "Shutting down with a session in progress"
            );
        }

        info!("Shutdown complete");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.load_settings()?;

    let log_dir = args.log_dir.clone().unwrap_or_else(default_log_dir);
    let log_path = logging::init_logging(&settings.logging, &log_dir, &settings.logging.level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_path = %log_path.display(),
        "dbwatchd starting"
    );
    debug!(settings = ?settings, "Effective settings");

    let display = (!args.no_display).then(|| ConsoleDisplay::new(args.display_format));
    let mut service = Service::new(settings, display);

    if args.once {
        service.tick().await;
        return Ok(());
    }

    service.run().await
}
