//! Identity and network fields shared by every dialect.

use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};

/// Lowest valid TCP port.
pub const MIN_PORT: i32 = 1;

/// Highest valid TCP port.
pub const MAX_PORT: i32 = 65535;

/// Host, port, credentials and target database.
///
/// Built by the caller as plain data and checked with [`BaseConfig::validate`].
/// `port` is signed so zero and negative values can be represented and rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: i32,
    /// Login user.
    pub username: String,
    /// Login password. Not validated.
    pub password: String,
    /// Database to connect to.
    pub database: String,
    /// Session time zone, e.g. `UTC` or `Asia/Ho_Chi_Minh`. Not validated.
    pub time_zone: String,
}

impl BaseConfig {
    /// Create a configuration with the required identity fields.
    pub fn new(
        host: impl Into<String>,
        port: i32,
        username: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the session time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Check the mandatory fields.
    ///
    /// Checks run in the order host, port, username, database and the first
    /// failure is returned. Whitespace-only strings count as empty.
    pub fn validate(&self) -> DbResult<()> {
        if self.host.trim().is_empty() {
            return Err(DbError::MissingHost);
        }

        if !(MIN_PORT..=MAX_PORT).contains(&self.port) {
            return Err(DbError::InvalidPort);
        }

        if self.username.trim().is_empty() {
            return Err(DbError::MissingUsername);
        }

        if self.database.trim().is_empty() {
            return Err(DbError::MissingDatabase);
        }

        Ok(())
    }

    /// Port as `u16`. Only meaningful after a successful [`validate`](Self::validate).
    pub fn port_u16(&self) -> u16 {
        u16::try_from(self.port).unwrap_or_default()
    }
}
