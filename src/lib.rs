//! # dbkit
//!
//! Validated configuration and pooled connections for PostgreSQL, MySQL and
//! ClickHouse.
//!
//! dbkit does three things: it checks connection settings, fills in sane pool
//! defaults, and opens a pool through an existing driver (SQLx for
//! PostgreSQL and MySQL, the HTTP client for ClickHouse). Queries are run
//! against the driver handle returned by [`Connection::db`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbkit::{BaseConfig, PgSslMode, PostgresConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dbkit::DbError> {
//!     dbkit::logging::init();
//!
//!     let config = PostgresConfig::new(
//!         BaseConfig::new("localhost", 5432, "app", "appdb")
//!             .with_password("secret")
//!             .with_time_zone("UTC"),
//!     )
//!     .with_ssl_mode(PgSslMode::Require);
//!
//!     let conn = dbkit::new_postgres_connection(config).await?;
//!     conn.ping().await?;
//!
//!     let pool = conn.db().as_postgres().expect("postgres pool");
//!     sqlx::query("SELECT 1").execute(pool).await.ok();
//!
//!     conn.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Configuration problems are reported before any network activity and can
//! be matched on directly:
//!
//! ```rust
//! use dbkit::{BaseConfig, DbError, MySqlConfig};
//!
//! let config = MySqlConfig::new(BaseConfig::new("  ", 3306, "root", "app"));
//! assert!(matches!(config.validate(), Err(DbError::MissingHost)));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod connection;
pub mod logging;

pub use connection::Connection;

/// Configuration types.
pub mod config {
    pub use dbkit_config::*;
}

/// Dialect openers and pool types.
pub mod dialects {
    pub use dbkit_dialects::*;
}

// Re-export key types at the crate root
pub use dbkit_config::{
    BaseConfig, ClickHouseConfig, DbError, DbKitSettings, DbResult, DialectKind, ErrorKind,
    MySqlConfig, PgSslMode, PoolConfig, PostgresConfig,
};
pub use dbkit_dialects::{
    ClickHouseDialect, DatabasePool, Dialect, MySqlDialect, PoolStatus, PostgresDialect,
};

/// Re-export of the SQLx crate used for PostgreSQL and MySQL pools.
pub use sqlx;

/// Re-export of the ClickHouse client crate.
pub use clickhouse;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        BaseConfig, ClickHouseConfig, Connection, DbError, DbResult, ErrorKind, MySqlConfig,
        PgSslMode, PoolConfig, PostgresConfig,
    };
    pub use crate::{new_clickhouse_connection, new_mysql_connection, new_postgres_connection};
}

/// Open a PostgreSQL connection.
///
/// Returns the validation error unchanged if the configuration is invalid,
/// without touching the network.
pub async fn new_postgres_connection(config: PostgresConfig) -> DbResult<Connection> {
    config.validate()?;
    Connection::open(&PostgresDialect::new(config)).await
}

/// Open a MySQL connection.
///
/// Returns the validation error unchanged if the configuration is invalid,
/// without touching the network.
pub async fn new_mysql_connection(config: MySqlConfig) -> DbResult<Connection> {
    config.validate()?;
    Connection::open(&MySqlDialect::new(config)).await
}

/// Open a ClickHouse connection.
///
/// Returns the validation error unchanged if the configuration is invalid,
/// without touching the network. Pool settings are recorded on the handle
/// but not applied to the HTTP client.
pub async fn new_clickhouse_connection(config: ClickHouseConfig) -> DbResult<Connection> {
    config.validate()?;
    Connection::open(&ClickHouseDialect::new(config)).await
}

/// Open every dialect configured in `settings`.
///
/// Sections are opened in the order PostgreSQL, MySQL, ClickHouse and the
/// first failure is returned.
pub async fn connect_all(settings: &DbKitSettings) -> DbResult<Vec<Connection>> {
    settings.validate()?;

    let mut connections = Vec::new();
    if let Some(pg) = &settings.postgres {
        connections.push(new_postgres_connection(pg.clone()).await?);
    }
    if let Some(my) = &settings.mysql {
        connections.push(new_mysql_connection(my.clone()).await?);
    }
    if let Some(ch) = &settings.clickhouse {
        connections.push(new_clickhouse_connection(ch.clone()).await?);
    }
    Ok(connections)
}
