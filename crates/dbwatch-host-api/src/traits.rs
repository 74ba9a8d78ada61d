//! Host capability traits

use async_trait::async_trait;
use dbwatch_api::DbSession;
use std::time::Duration;
use thiserror::Error;

/// Errors from host capability operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Connection timed out after {}s", .0.as_secs())]
    ConnectTimeout(Duration),

    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HostResult<T> = Result<T, HostError>;

/// Reports the user sessions currently bound to the watched database
#[async_trait]
pub trait ActivityProbe: Send + Sync {
    /// Query the server once.
    ///
    /// Implementations exclude their own connection and non-user processes.
    /// Rows come back in a stable order; only the first row's program name
    /// is shown to the user.
    async fn sessions(&self) -> HostResult<Vec<DbSession>>;

    /// Human-readable description of what is being probed (for logs)
    fn describe(&self) -> String;
}

/// Fire-and-forget user notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> HostResult<()>;

    /// Name of the delivery mechanism (for logs)
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_message() {
        let err = HostError::ConnectTimeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "Connection timed out after 5s");
    }

    #[test]
    fn query_failure_message() {
        let err = HostError::QueryFailed("relation does not exist".into());
        assert_eq!(err.to_string(), "Query failed: relation does not exist");
    }
}
