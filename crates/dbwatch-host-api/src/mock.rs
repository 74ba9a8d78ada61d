//! Mock capabilities for testing

use async_trait::async_trait;
use dbwatch_api::DbSession;
use dbwatch_util::DbSessionId;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{ActivityProbe, HostError, HostResult, Notifier};

/// Scripted activity probe.
///
/// Queued results are returned first, in order; once the queue is empty
/// every call returns the current steady-state session list.
pub struct MockProbe {
    script: Mutex<VecDeque<HostResult<Vec<DbSession>>>>,
    steady: Mutex<Vec<DbSession>>,
    calls: AtomicU64,
}

impl MockProbe {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            steady: Mutex::new(Vec::new()),
            calls: AtomicU64::new(0),
        }
    }

    /// Build a session row the way a real server would report it
    pub fn session(id: i32, program: &str) -> DbSession {
        DbSession {
            session_id: DbSessionId::new(id),
            program_name: Some(program.to_string()),
            login_name: Some("mock".into()),
            host_name: Some("localhost".into()),
            last_request_at: None,
        }
    }

    /// Replace the steady-state session list
    pub fn set_sessions(&self, sessions: Vec<DbSession>) {
        *self.steady.lock().unwrap() = sessions;
    }

    /// Queue a one-off result
    pub fn push_result(&self, result: HostResult<Vec<DbSession>>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// Queue a one-off failure
    pub fn fail_next(&self, error: HostError) {
        self.push_result(Err(error));
    }

    /// Number of times the probe has been queried
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivityProbe for MockProbe {
    async fn sessions(&self) -> HostResult<Vec<DbSession>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(result) = self.script.lock().unwrap().pop_front() {
            return result;
        }
        Ok(self.steady.lock().unwrap().clone())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Notifier that records every notification
pub struct MockNotifier {
    sent: Mutex<Vec<(String, String)>>,

    /// Configure notify to fail
    pub fail: Mutex<bool>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    /// Every `(title, message)` delivered so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages delivered so far, without titles
    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, title: &str, message: &str) -> HostResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(HostError::NotifyFailed("Mock notify failure".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_probe_script_then_steady() {
        let probe = MockProbe::new();
        probe.set_sessions(vec![MockProbe::session(7, "psql")]);
        probe.fail_next(HostError::ConnectFailed("refused".into()));

        assert!(probe.sessions().await.is_err());
        let rows = probe.sessions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].program_name.as_deref(), Some("psql"));
        assert_eq!(probe.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_notifier_records() {
        let notifier = MockNotifier::new();
        notifier.notify("Database Monitor", "hello").await.unwrap();

        assert_eq!(
            notifier.sent(),
            vec![("Database Monitor".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn mock_notifier_failure() {
        let notifier = MockNotifier::new();
        *notifier.fail.lock().unwrap() = true;

        assert!(notifier.notify("t", "m").await.is_err());
        assert!(notifier.messages().is_empty());
    }
}
