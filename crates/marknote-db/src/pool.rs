//! Connection pool setup.
//!
//! marknote opens one `PgPool` per process; [`crate::Database`] hands a
//! clone of the handle to each repository. Sizing defaults assume a
//! personal deployment serving a single user's editor and dashboard,
//! not a fleet of clients.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use marknote_core::{Error, Result};

/// Sizing and timeout knobs for the process-wide pool.
///
/// The defaults stay deliberately small: five connections cover a burst
/// of list/search requests from one user while leaving headroom on a
/// development database shared with psql sessions.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// How long a caller waits for a free connection before erroring.
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl PoolConfig {
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Open a pool against `database_url` with these settings.
    pub async fn connect(&self, database_url: &str) -> Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .connect(database_url)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "pool",
            op = "connect",
            max_connections = self.max_connections,
            pool_size = pool.size(),
            pool_idle = pool.num_idle(),
            "Connection pool ready"
        );
        Ok(pool)
    }
}
