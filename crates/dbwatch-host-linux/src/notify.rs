//! Desktop notifications
//!
//! Backends, in order of preference:
//! - freedesktop notification service (via `notify-send`)
//! - the log (always available)

use async_trait::async_trait;
use dbwatch_config::NotificationSettings;
use dbwatch_host_api::{HostError, HostResult, Notifier};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

const NOTIFY_SEND: &str = "notify-send";

/// Notifier backed by `notify-send`
pub struct DesktopNotifier {
    app_name: String,
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            app_name: settings.app_name.clone(),
            timeout: settings.timeout,
        }
    }

    /// Check whether `notify-send` is installed and runnable
    pub fn is_available() -> bool {
        std::process::Command::new(NOTIFY_SEND)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn args(&self, title: &str, message: &str) -> Vec<String> {
        vec![
            format!("--app-name={}", self.app_name),
            format!("--expire-time={}", self.timeout.as_millis()),
            "--".to_string(),
            title.to_string(),
            message.to_string(),
        ]
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) -> HostResult<()> {
        debug!(title, message, "Sending desktop notification");

        let output = Command::new(NOTIFY_SEND)
            .args(self.args(title, message))
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(HostError::NotifyFailed(format!(
                "{} exited with {}: {}",
                NOTIFY_SEND,
                output.status,
                stderr.trim()
            )))
        }
    }

    fn backend(&self) -> &'static str {
        "freedesktop"
    }
}

/// Notifier that only writes to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, message: &str) -> HostResult<()> {
        warn!(title, message, "Notification");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "log"
    }
}

/// Pick the best notifier this host supports
pub fn detect_notifier(settings: &NotificationSettings) -> Arc<dyn Notifier> {
    if DesktopNotifier::is_available() {
        info!("Detected freedesktop notification backend");
        Arc::new(DesktopNotifier::new(settings))
    } else {
        warn!("notify-send not found, notifications will only be logged");
        Arc::new(LogNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbwatch_config::Settings;

    #[test]
    fn notify_send_arguments() {
        let settings = Settings::default();
        let notifier = DesktopNotifier::new(&settings.notifications);

        let args = notifier.args("Database Monitor", "5 minutes remaining!");
        assert_eq!(
            args,
            vec![
                "--app-name=dbwatch",
                "--expire-time=10000",
                "--",
                "Database Monitor",
                "5 minutes remaining!",
            ]
        );
    }

    #[test]
    fn message_starting_with_dash_is_not_a_flag() {
        let settings = Settings::default();
        let notifier = DesktopNotifier::new(&settings.notifications);

        let args = notifier.args("t", "-u critical");
        assert_eq!(args[2], "--");
        assert_eq!(args[4], "-u critical");
    }

    #[tokio::test]
    async fn log_notifier_never_fails() {
        let notifier = LogNotifier;
        assert!(notifier.notify("Database Monitor", "hello").await.is_ok());
        assert_eq!(notifier.backend(), "log");
    }

    #[test]
    fn detect_returns_a_backend() {
        let settings = Settings::default();
        let notifier = detect_notifier(&settings.notifications);
        assert!(matches!(notifier.backend(), "freedesktop" | "log"));
    }
}
