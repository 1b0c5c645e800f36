//! Settings file parsing for `dbkit.toml`.
//!
//! ```toml
//! [postgres]
//! host = "localhost"
//! port = 5432
//! username = "app"
//! password = "${PG_PASSWORD}"
//! database = "app"
//! time_zone = "UTC"
//! ssl_mode = "verify-full"
//!
//! [postgres.pool]
//! max_idle_connection = 10
//! max_open_connection = 50
//! conn_max_lifetime = "1h"
//! conn_max_idle_time = "10m"
//! ```
//!
//! `${VAR}` is replaced with the environment variable `VAR` and
//! `${VAR:-fallback}` falls back when `VAR` is unset. An unset `${VAR}`
//! without a fallback is left as written.
//!
//! Unknown keys are rejected at every level: sections, dialect tables and
//! `pool` tables.

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::{ClickHouseConfig, DialectKind, MySqlConfig, PostgresConfig};
use crate::error::{DbError, DbResult};

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid env var pattern")
});

/// Connection settings for any of the supported dialects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DbKitSettings {
    /// PostgreSQL connection.
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,

    /// MySQL connection.
    #[serde(default)]
    pub mysql: Option<MySqlConfig>,

    /// ClickHouse connection.
    #[serde(default)]
    pub clickhouse: Option<ClickHouseConfig>,
}

impl DbKitSettings {
    /// Load settings from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DbError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!(path = %path.display(), "Loading dbkit settings");
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(content: &str) -> DbResult<Self> {
        let expanded = expand_env_vars(content);
        toml::from_str(&expanded).map_err(|e| DbError::Toml { source: e })
    }

    /// Dialects that have a section.
    pub fn configured(&self) -> Vec<DialectKind> {
        let mut kinds = Vec::new();
        if self.postgres.is_some() {
            kinds.push(DialectKind::Postgres);
        }
        if self.mysql.is_some() {
            kinds.push(DialectKind::MySql);
        }
        if self.clickhouse.is_some() {
            kinds.push(DialectKind::ClickHouse);
        }
        kinds
    }

    /// Validate every configured section.
    pub fn validate(&self) -> DbResult<()> {
        if let Some(pg) = &self.postgres {
            pg.validate()?;
        }
        if let Some(my) = &self.mysql {
            my.validate()?;
        }
        if let Some(ch) = &self.clickhouse {
            ch.validate()?;
        }
        Ok(())
    }

    /// The PostgreSQL section, or a settings error if absent.
    pub fn require_postgres(&self) -> DbResult<&PostgresConfig> {
        self.postgres
            .as_ref()
            .ok_or_else(|| DbError::settings("missing [postgres] section"))
    }

    /// The MySQL section, or a settings error if absent.
    pub fn require_mysql(&self) -> DbResult<&MySqlConfig> {
        self.mysql
            .as_ref()
            .ok_or_else(|| DbError::settings("missing [mysql] section"))
    }

    /// The ClickHouse section, or a settings error if absent.
    pub fn require_clickhouse(&self) -> DbResult<&ClickHouseConfig> {
        self.clickhouse
            .as_ref()
            .ok_or_else(|| DbError::settings("missing [clickhouse] section"))
    }
}

/// Expand `${VAR}` and `${VAR:-fallback}` references.
pub fn expand_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &Captures<'_>| {
            match (std::env::var(&caps[1]).ok(), caps.get(2)) {
                (Some(value), _) => value,
                (None, Some(fallback)) => fallback.as_str().to_string(),
                (None, None) => caps[0].to_string(),
            }
        })
        .into_owned()
}
