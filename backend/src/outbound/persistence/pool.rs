//! r2d2 pool of SQLite connections.
//!
//! Diesel's SQLite backend is synchronous, so [`DbPool::run`] checks out a
//! connection and runs the closure on tokio's blocking thread pool. The
//! pooled connection is returned on drop, whichever way the closure exits.
//!
//! Every connection is prepared with `busy_timeout`, WAL journaling and
//! foreign key enforcement before first use.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use tracing::debug;

/// Errors raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available within the timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Pool error text.
        message: String,
    },

    /// The pool could not open its initial connections.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Pool error text.
        message: String,
    },

    /// The blocking task running the query panicked or was cancelled.
    #[error("database task failed: {message}")]
    Task {
        /// Join error text.
        message: String,
    },
}

impl PoolError {
    /// Checkout failure.
    #[must_use]
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Build failure.
    #[must_use]
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Blocking task failure.
    #[must_use]
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

/// Pool settings.
///
/// ```
/// use std::time::Duration;
/// use backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("storage.db")
///     .with_max_size(4)
///     .with_busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.database_url(), "storage.db");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
    busy_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: 10 connections, 30 s checkout timeout, 5 s busy timeout.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Upper bound on open connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// How long a checkout waits for a free connection.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// How long SQLite waits on a locked database before failing.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Path or URI of the database file.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        );
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Bounded pool of SQLite connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<ConnectionManager<SqliteConnection>>,
}

impl DbPool {
    /// Open the pool. The database file is created when missing.
    ///
    /// # Errors
    /// [`PoolError::Build`] when the file cannot be opened or prepared.
    pub fn new(config: &PoolConfig) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_url());
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .connection_customizer(Box::new(SqlitePragmas {
                busy_timeout: config.busy_timeout,
            }))
            .build(manager)
            .map_err(|err| PoolError::build(err.to_string()))?;
        debug!(
            database = config.database_url(),
            max_size = config.max_size,
            "sqlite pool ready"
        );
        Ok(Self { inner })
    }

    /// Run `operation` with a pooled connection on the blocking thread pool.
    ///
    /// # Errors
    /// Pool checkout and task failures are converted through
    /// `From<PoolError>`; everything else is the closure's own error.
    pub async fn run<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<PoolError> + Send + 'static,
    {
        let pool = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| E::from(PoolError::checkout(err.to_string())))?;
            operation(&mut *conn)
        })
        .await
        .map_err(|err| E::from(PoolError::task(err.to_string())))?
    }
}

impl std::fmt::Debug for DbPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state();
        f.debug_struct("DbPool")
            .field("connections", &state.connections)
            .field("idle", &state.idle_connections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::RunQueryDsl;
    use diesel::sql_types::Integer;
    use rstest::rstest;

    #[derive(diesel::QueryableByName)]
    struct Pragma {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    #[rstest]
    #[tokio::test]
    async fn connections_enforce_foreign_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pool.db");
        let pool = DbPool::new(&PoolConfig::new(path.to_string_lossy()).with_max_size(2))
            .expect("open pool");

        let enabled = pool
            .run(|conn| {
                diesel::sql_query("PRAGMA foreign_keys")
                    .get_result::<Pragma>(conn)
                    .map_err(|err| PoolError::checkout(err.to_string()))
            })
            .await
            .expect("query pragma");
        assert_eq!(enabled.foreign_keys, 1);
    }

    #[rstest]
    fn unopenable_path_fails_to_build() {
        let config = PoolConfig::new("/nonexistent-dir/for/sure/blog.db")
            .with_max_size(1)
            .with_connection_timeout(Duration::from_millis(200));
        assert!(matches!(DbPool::new(&config), Err(PoolError::Build { .. })));
    }
}
