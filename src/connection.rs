//! The uniform connection handle.

use dbkit_config::{DbResult, DialectKind, PoolConfig};
use dbkit_dialects::{DatabasePool, Dialect, PoolStatus};
use tracing::debug;

/// An opened, pooled connection to one database.
///
/// Owns its pool exclusively. [`close`](Self::close) releases it; afterwards
/// [`ping`](Self::ping) fails with the driver's closed error.
pub struct Connection {
    pool: DatabasePool,
    pool_config: PoolConfig,
}

impl Connection {
    /// Open a pool through `dialect` and wrap it.
    pub async fn open(dialect: &dyn Dialect) -> DbResult<Self> {
        let pool_config = dialect.pool_config();
        debug!(dialect = %dialect.kind(), ?pool_config, "Opening connection");

        let pool = dialect.open().await?;
        Ok(Self { pool, pool_config })
    }

    /// The raw pool, for driver-level use.
    pub fn db(&self) -> &DatabasePool {
        &self.pool
    }

    /// The dialect of this connection.
    pub fn dialect(&self) -> DialectKind {
        self.pool.kind()
    }

    /// The normalized pool settings the connection was opened with.
    pub fn pool_config(&self) -> &PoolConfig {
        &self.pool_config
    }

    /// Check the server is reachable.
    ///
    /// There is no built-in deadline; wrap the call in
    /// `tokio::time::timeout` to bound it.
    pub async fn ping(&self) -> DbResult<()> {
        self.pool.ping().await
    }

    /// Release the pool. Safe to call more than once.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check if [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Pool size and idle counts.
    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("dialect", &self.dialect())
            .field("pool_config", &self.pool_config)
            .field("is_closed", &self.is_closed())
            .finish()
    }
}
