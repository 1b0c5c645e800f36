//! ClickHouse dialect over the HTTP interface.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use dbkit_config::{ClickHouseConfig, DbError, DbResult, DialectKind, PoolConfig};
use tracing::{debug, info};

use crate::Dialect;
use crate::dsn::join_host_port;
use crate::pool::{ClickHousePool, DIAL_TIMEOUT, DatabasePool};

/// Server-side query time limit, in seconds.
pub const MAX_EXECUTION_TIME_SECS: u64 = 60;

/// Everything needed to build a ClickHouse client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClickHouseOptions {
    /// `http://host:port`.
    pub url: String,
    /// Default database.
    pub database: String,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Settings sent with every query.
    pub settings: Vec<(String, String)>,
    /// Limit for the connectivity check when opening.
    pub dial_timeout: Duration,
}

impl Default for ClickHouseOptions {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".to_string(),
            database: "default".to_string(),
            username: "default".to_string(),
            password: String::new(),
            settings: vec![(
                "max_execution_time".to_string(),
                MAX_EXECUTION_TIME_SECS.to_string(),
            )],
            dial_timeout: DIAL_TIMEOUT,
        }
    }
}

impl ClickHouseOptions {
    /// Build the descriptor from a validated configuration.
    pub fn from_config(config: &ClickHouseConfig) -> Self {
        let base = &config.base;
        Self {
            url: format!(
                "http://{}",
                join_host_port(base.host.trim(), base.port_u16())
            ),
            database: base.database.clone(),
            username: base.username.clone(),
            password: base.password.clone(),
            ..Default::default()
        }
    }

    /// Build a client. No request is made.
    pub fn client(&self) -> ::clickhouse::Client {
        let mut client = ::clickhouse::Client::default()
            .with_url(&self.url)
            .with_database(&self.database)
            .with_user(&self.username);

        if !self.password.is_empty() {
            client = client.with_password(&self.password);
        }

        for (name, value) in &self.settings {
            client = client.with_option(name, value);
        }

        client
    }
}

impl fmt::Debug for ClickHouseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHouseOptions")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("settings", &self.settings)
            .field("dial_timeout", &self.dial_timeout)
            .finish()
    }
}

/// Opens ClickHouse clients.
#[derive(Debug, Clone)]
pub struct ClickHouseDialect {
    config: ClickHouseConfig,
}

impl ClickHouseDialect {
    /// Create a dialect for the given configuration.
    pub fn new(config: ClickHouseConfig) -> Self {
        Self { config }
    }

    /// The descriptor handed to the client.
    pub fn options(&self) -> ClickHouseOptions {
        ClickHouseOptions::from_config(&self.config)
    }
}

#[async_trait]
impl Dialect for ClickHouseDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::ClickHouse
    }

    fn pool_config(&self) -> PoolConfig {
        self.config.pool.normalized()
    }

    async fn open(&self) -> DbResult<DatabasePool> {
        self.config.validate()?;

        let options = self.options();
        debug!(url = %options.url, database = %options.database, "Built ClickHouse descriptor");

        let client = options.client();
        let check = client.query("SELECT 1").execute();
        match tokio::time::timeout(options.dial_timeout, check).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(DbError::open(DialectKind::ClickHouse, e)),
            Err(elapsed) => return Err(DbError::open(DialectKind::ClickHouse, elapsed)),
        }

        info!(
            url = %options.url,
            database = %options.database,
            "ClickHouse client opened"
        );

        Ok(DatabasePool::ClickHouse(ClickHousePool::new(client, options)))
    }
}
