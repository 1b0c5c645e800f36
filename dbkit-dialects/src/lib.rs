//! # dbkit-dialects
//!
//! Pool openers for PostgreSQL and MySQL (through SQLx) and ClickHouse
//! (through its HTTP client).
//!
//! Every dialect validates its configuration, builds a connection string or
//! descriptor, applies the normalized pool settings and verifies
//! connectivity once. Failures are reported as
//! [`DbError::Open`](dbkit_config::DbError::Open) and never retried.
//!
//! ```rust,ignore
//! use dbkit_config::{BaseConfig, PostgresConfig};
//! use dbkit_dialects::{Dialect, PostgresDialect};
//!
//! let config = PostgresConfig::new(BaseConfig::new("localhost", 5432, "app", "appdb"));
//! let pool = PostgresDialect::new(config).open().await?;
//! pool.ping().await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use dbkit_config::{DbResult, DialectKind, PoolConfig};

pub mod clickhouse;
pub mod dsn;
pub mod mysql;
pub mod pool;
pub mod postgres;

pub use clickhouse::{ClickHouseDialect, ClickHouseOptions};
pub use mysql::MySqlDialect;
pub use pool::{ClickHousePool, DatabasePool, PoolStatus};
pub use postgres::PostgresDialect;

/// A database family that can open a pool.
#[async_trait]
pub trait Dialect: Send + Sync {
    /// Which family this is.
    fn kind(&self) -> DialectKind;

    /// The normalized pool settings this dialect opens with.
    fn pool_config(&self) -> PoolConfig;

    /// Validate, connect and return the opened pool.
    async fn open(&self) -> DbResult<DatabasePool>;
}
