//! Connection pool for SQL Server.
//!
//! The matrix is read with a single query, so the pool holds one connection;
//! bb8 is used for its connection management and timeout handling.

use std::sync::Arc;
use std::time::Duration;

use bb8::{Pool, RunError};
use bb8_tiberius::ConnectionManager;
use tracing::{debug, info};

use crate::config::MssqlConfig;
use crate::connection::MssqlConnection;
use crate::error::{MssqlError, MssqlResult};

/// A connection pool for SQL Server.
#[derive(Clone)]
pub struct MssqlPool {
    inner: Pool<ConnectionManager>,
    config: Arc<MssqlConfig>,
}

impl MssqlPool {
    /// Connect to the server described by `config`.
    pub async fn connect(config: MssqlConfig) -> MssqlResult<Self> {
        let manager = ConnectionManager::new(config.to_tiberius_config()?);

        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(0))
            .connection_timeout(config.connect_timeout)
            .build(manager)
            .await
            .map_err(|e| MssqlError::pool(format!("failed to create pool: {}", e)))?;

        info!(
            server = %config.server_display(),
            database = %config.database,
            "MSSQL connection pool created"
        );

        Ok(Self {
            inner: pool,
            config: Arc::new(config),
        })
    }

    /// Get a connection from the pool.
    pub async fn get(&self) -> MssqlResult<MssqlConnection<'_>> {
        debug!("Acquiring connection from pool");
        let client = self
            .inner
            .get()
            .await
            .map_err(|e| run_error(e, self.config.connect_timeout))?;
        Ok(MssqlConnection::new(client))
    }
}

/// Map a bb8 checkout failure, reporting the timeout the pool was built with.
fn run_error<E: std::fmt::Display>(err: RunError<E>, timeout: Duration) -> MssqlError {
    match err {
        RunError::User(e) => MssqlError::pool(e.to_string()),
        RunError::TimedOut => MssqlError::Timeout(timeout.as_millis() as u64),
    }
}

impl std::fmt::Debug for MssqlPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlPool")
            .field("server", &self.config.server_display())
            .field("database", &self.config.database)
            .finish()
    }
}
