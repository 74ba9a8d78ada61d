//! `pg_stat_activity` probe

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dbwatch_api::DbSession;
use dbwatch_config::DatabaseSettings;
use dbwatch_host_api::{ActivityProbe, HostError, HostResult};
use dbwatch_util::DbSessionId;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, FromRow, PgConnection};
use std::time::Duration;
use tracing::{debug, warn};

/// Name the monitor's own connection reports to the server
pub const MONITOR_APPLICATION_NAME: &str = "dbwatch";

/// Client sessions on a database, excluding the caller and background workers
pub const ACTIVE_SESSIONS_QUERY: &str = r#"
SELECT
    a.pid,
    a.application_name,
    a.usename::text AS usename,
    a.client_hostname,
    a.state_change
FROM pg_stat_activity a
WHERE a.datname = $1
    AND a.pid <> pg_backend_pid()
    AND a.backend_type = 'client backend'
ORDER BY a.backend_start, a.pid
"#;

#[derive(Debug, FromRow)]
struct ActivityRow {
    pid: i32,
    application_name: Option<String>,
    usename: Option<String>,
    client_hostname: Option<String>,
    state_change: Option<DateTime<Utc>>,
}

impl From<ActivityRow> for DbSession {
    fn from(row: ActivityRow) -> Self {
        DbSession {
            session_id: DbSessionId::new(row.pid),
            program_name: row.application_name,
            login_name: row.usename,
            host_name: row.client_hostname,
            last_request_at: row.state_change,
        }
    }
}

/// Probe that queries a PostgreSQL server once per call
pub struct PostgresProbe {
    options: PgConnectOptions,
    database: String,
    connect_timeout: Duration,
    target: String,
}

impl PostgresProbe {
    pub fn new(settings: &DatabaseSettings) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&settings.server)
            .port(settings.port)
            .database(&settings.database)
            .application_name(MONITOR_APPLICATION_NAME);

        if let Some(user) = &settings.user {
            options = options.username(user);
        }
        if let Some(password) = &settings.password {
            options = options.password(password);
        }

        Self {
            options,
            database: settings.database.clone(),
            connect_timeout: settings.connect_timeout,
            target: format!(
                "{}:{}/{}",
                settings.server, settings.port, settings.database
            ),
        }
    }

    async fn connect(&self) -> HostResult<PgConnection> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(HostError::ConnectFailed(e.to_string())),
            Err(_) => Err(HostError::ConnectTimeout(self.connect_timeout)),
        }
    }
}

#[async_trait]
impl ActivityProbe for PostgresProbe {
    async fn sessions(&self) -> HostResult<Vec<DbSession>> {
        let mut conn = self.connect().await?;

        let result = sqlx::query_as::<_, ActivityRow>(ACTIVE_SESSIONS_QUERY)
            .bind(&self.database)
            .fetch_all(&mut conn)
            .await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close probe connection cleanly");
        }

        let rows = result.map_err(|e| HostError::QueryFailed(e.to_string()))?;
        debug!(target_db = %self.target, sessions = rows.len(), "Probe complete");

        Ok(rows.into_iter().map(DbSession::from).collect())
    }

    fn describe(&self) -> String {
        format!("postgres://{}", self.target)
    }
}
