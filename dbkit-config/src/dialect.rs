//! Per-dialect configuration.
//!
//! Each dialect config holds a [`BaseConfig`] and a [`PoolConfig`] plus its own
//! fields. Validation only looks at the base; dialect fields go to the driver
//! as they are.
//!
//! In a settings file each config is one flat table. Keys that belong to no
//! field of that dialect are rejected, so a misspelled `sslmode` is an error
//! rather than a silent `disable`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base::BaseConfig;
use crate::error::{DbError, DbResult};
use crate::pool::PoolConfig;

/// Supported database families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// PostgreSQL.
    #[serde(alias = "postgresql")]
    Postgres,
    /// MySQL.
    #[serde(alias = "mariadb")]
    MySql,
    /// ClickHouse.
    ClickHouse,
}

impl DialectKind {
    /// Human-readable name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::ClickHouse => "ClickHouse",
        }
    }

    /// Conventional server port.
    pub fn default_port(&self) -> i32 {
        match self {
            Self::Postgres => 5432,
            Self::MySql => 3306,
            Self::ClickHouse => 8123,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PostgreSQL `sslmode`.
///
/// Known modes are matched case-insensitively after trimming. Unknown strings
/// are kept in [`PgSslMode::Other`] and passed to the driver unchanged. Use
/// [`str::parse`] for a strict parse that rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum PgSslMode {
    /// Never use TLS.
    #[default]
    Disable,
    /// Try plain first, then TLS.
    Allow,
    /// Try TLS first, then plain.
    Prefer,
    /// Require TLS without certificate checks.
    Require,
    /// Require TLS and verify the CA.
    VerifyCa,
    /// Require TLS and verify the CA and host name.
    VerifyFull,
    /// Any other value, forwarded verbatim.
    Other(String),
}

impl PgSslMode {
    /// The value placed in the connection string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
            Self::Other(s) => s,
        }
    }

    /// Check if this is one of the modes PostgreSQL defines.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    fn known(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Some(Self::Disable),
            "allow" => Some(Self::Allow),
            "prefer" => Some(Self::Prefer),
            "require" => Some(Self::Require),
            "verify-ca" => Some(Self::VerifyCa),
            "verify-full" => Some(Self::VerifyFull),
            _ => None,
        }
    }
}

impl FromStr for PgSslMode {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::known(s).ok_or_else(|| DbError::InvalidSslMode(s.to_string()))
    }
}

impl From<String> for PgSslMode {
    fn from(s: String) -> Self {
        if s.trim().is_empty() {
            return Self::default();
        }
        Self::known(&s).unwrap_or(Self::Other(s))
    }
}

impl From<&str> for PgSslMode {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<PgSslMode> for String {
    fn from(mode: PgSslMode) -> Self {
        match mode {
            PgSslMode::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PgSslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat form of a dialect table.
///
/// `deny_unknown_fields` has no effect through `#[serde(flatten)]`, so the
/// configs deserialize from this and check dialect-only keys themselves.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SectionFields {
    host: String,
    port: i32,
    username: String,
    password: String,
    database: String,
    time_zone: String,
    pool: PoolConfig,
    ssl_mode: Option<PgSslMode>,
}

impl SectionFields {
    fn split(self) -> (BaseConfig, PoolConfig, Option<PgSslMode>) {
        let base = BaseConfig {
            host: self.host,
            port: self.port,
            username: self.username,
            password: self.password,
            database: self.database,
            time_zone: self.time_zone,
        };
        (base, self.pool, self.ssl_mode)
    }
}

macro_rules! dialect_config_common {
    ($ty:ident) => {
        impl $ty {
            /// Set the pool settings.
            pub fn with_pool(mut self, pool: PoolConfig) -> Self {
                self.pool = pool;
                self
            }

            /// Check the embedded base configuration.
            pub fn validate(&self) -> DbResult<()> {
                self.base.validate()
            }
        }

        impl From<BaseConfig> for $ty {
            fn from(base: BaseConfig) -> Self {
                Self::new(base)
            }
        }
    };
}

/// PostgreSQL configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "SectionFields")]
pub struct PostgresConfig {
    /// Identity and network fields.
    #[serde(flatten)]
    pub base: BaseConfig,
    /// Pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
    /// TLS mode, passed to the driver without local checks.
    #[serde(default)]
    pub ssl_mode: PgSslMode,
}

impl PostgresConfig {
    /// Create a configuration with default pool settings and `sslmode=disable`.
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    /// Set the SSL mode.
    pub fn with_ssl_mode(mut self, mode: impl Into<PgSslMode>) -> Self {
        self.ssl_mode = mode.into();
        self
    }
}

dialect_config_common!(PostgresConfig);

impl TryFrom<SectionFields> for PostgresConfig {
    type Error = String;

    fn try_from(fields: SectionFields) -> Result<Self, Self::Error> {
        let (base, pool, ssl_mode) = fields.split();
        Ok(Self {
            base,
            pool,
            ssl_mode: ssl_mode.unwrap_or_default(),
        })
    }
}

/// MySQL configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "SectionFields")]
pub struct MySqlConfig {
    /// Identity and network fields.
    #[serde(flatten)]
    pub base: BaseConfig,
    /// Pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
}

impl MySqlConfig {
    /// Create a configuration with default pool settings.
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}

dialect_config_common!(MySqlConfig);

impl TryFrom<SectionFields> for MySqlConfig {
    type Error = String;

    fn try_from(fields: SectionFields) -> Result<Self, Self::Error> {
        match fields.split() {
            (base, pool, None) => Ok(Self { base, pool }),
            (_, _, Some(_)) => Err(format!(
                "`ssl_mode` is not supported for {}",
                DialectKind::MySql
            )),
        }
    }
}

/// ClickHouse configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "SectionFields")]
pub struct ClickHouseConfig {
    /// Identity and network fields.
    #[serde(flatten)]
    pub base: BaseConfig,
    /// Pool settings. Recorded on the handle but not applied by the ClickHouse opener.
    #[serde(default)]
    pub pool: PoolConfig,
}

impl ClickHouseConfig {
    /// Create a configuration with default pool settings.
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}

dialect_config_common!(ClickHouseConfig);

impl TryFrom<SectionFields> for ClickHouseConfig {
    type Error = String;

    fn try_from(fields: SectionFields) -> Result<Self, Self::Error> {
        match fields.split() {
            (base, pool, None) => Ok(Self { base, pool }),
            (_, _, Some(_)) => Err(format!(
                "`ssl_mode` is not supported for {}",
                DialectKind::ClickHouse
            )),
        }
    }
}
