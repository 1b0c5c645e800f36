//! # dbkit-config
//!
//! Connection configuration for dbkit: the identity fields every dialect
//! needs, pool defaults, per-dialect configs and a TOML settings loader.
//!
//! Nothing here performs I/O except [`DbKitSettings::from_file`].
//!
//! ```rust
//! use dbkit_config::{BaseConfig, PoolConfig, PostgresConfig};
//!
//! let config = PostgresConfig::new(BaseConfig::new("localhost", 5432, "app", "appdb"))
//!     .with_ssl_mode("require");
//! config.validate().unwrap();
//!
//! let pool = PoolConfig::default().normalized();
//! assert_eq!(pool.max_open_connection, 10);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod base;
pub mod dialect;
pub mod error;
pub mod pool;
pub mod settings;

pub use base::BaseConfig;
pub use dialect::{ClickHouseConfig, DialectKind, MySqlConfig, PgSslMode, PostgresConfig};
pub use error::{BoxError, DbError, DbResult, ErrorKind};
pub use pool::PoolConfig;
pub use settings::DbKitSettings;
