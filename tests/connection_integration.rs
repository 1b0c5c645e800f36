//! Integration tests for opening connections.
//!
//! Tests marked `#[ignore]` need live servers. Point them at a server with
//! `DBKIT_TEST_PG_PORT`, `DBKIT_TEST_MYSQL_PORT` and `DBKIT_TEST_CH_PORT`
//! (host `localhost`, user/password `test`, database `dbkit_test`) and run
//! `cargo test -- --ignored`.

use dbkit::prelude::*;
use dbkit::{DbKitSettings, DialectKind};

fn base(port: i32) -> BaseConfig {
    BaseConfig::new("localhost", port, "test", "dbkit_test")
        .with_password("test")
        .with_time_zone("Asia/Ho_Chi_Minh")
}

fn env_port(var: &str, default: i32) -> i32 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Invalid configs must return the validation error, not a wrapped open error
#[tokio::test]
async fn test_invalid_config_short_circuits() {
    let mut pg = PostgresConfig::new(base(5433)).with_ssl_mode(PgSslMode::Disable);
    pg.base.host.clear();
    let err = new_postgres_connection(pg).await.unwrap_err();
    assert!(matches!(err, DbError::MissingHost));

    let my = MySqlConfig::new(base(0));
    let err = new_mysql_connection(my).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidPort));

    let mut ch = ClickHouseConfig::new(base(8123));
    ch.base.username = "   ".into();
    let err = new_clickhouse_connection(ch).await.unwrap_err();
    assert!(matches!(err, DbError::MissingUsername));
}

/// Unreachable servers are reported with the dialect name
#[tokio::test]
async fn test_wrong_port_is_wrapped() {
    let started = std::time::Instant::now();
    let err = new_postgres_connection(PostgresConfig::new(base(4953)))
        .await
        .unwrap_err();
    assert!(started.elapsed() < dbkit::dialects::pool::DIAL_TIMEOUT);
    assert_eq!(err.kind(), ErrorKind::Open);
    assert!(err.to_string().contains("failed to open PostgreSQL connection"));

    let err = new_mysql_connection(MySqlConfig::new(base(4953)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to open MySQL connection"));

    let err = new_clickhouse_connection(ClickHouseConfig::new(base(4953)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to open ClickHouse connection"));
}

/// connect_all validates every section before opening anything
#[tokio::test]
async fn test_connect_all_validates_first() {
    let settings = DbKitSettings {
        postgres: Some(PostgresConfig::new(base(4953))),
        mysql: Some(MySqlConfig::new(BaseConfig {
            database: String::new(),
            ..base(3306)
        })),
        clickhouse: None,
    };

    let err = dbkit::connect_all(&settings).await.unwrap_err();
    assert!(matches!(err, DbError::MissingDatabase));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_postgres_connection_lifecycle() {
    let config = PostgresConfig::new(base(env_port("DBKIT_TEST_PG_PORT", 5432)));
    let conn = new_postgres_connection(config).await.unwrap();

    conn.ping().await.unwrap();
    assert!(conn.db().as_postgres().is_some());
    assert_eq!(conn.dialect(), DialectKind::Postgres);
    assert_eq!(conn.pool_config(), &PoolConfig::default().normalized());

    conn.close().await;
    conn.close().await;

    let err = conn.ping().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Closed);
    assert_eq!(err.to_string(), "database is closed");
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_mysql_connection_lifecycle() {
    let config = MySqlConfig::new(base(env_port("DBKIT_TEST_MYSQL_PORT", 3306)));
    let conn = new_mysql_connection(config).await.unwrap();

    conn.ping().await.unwrap();
    assert!(conn.db().as_mysql().is_some());

    conn.close().await;

    let err = conn.ping().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Closed);
}

#[tokio::test]
#[ignore = "requires a running ClickHouse server"]
async fn test_clickhouse_connection_lifecycle() {
    let config = ClickHouseConfig::new(base(env_port("DBKIT_TEST_CH_PORT", 8123)));
    let conn = new_clickhouse_connection(config).await.unwrap();

    conn.ping().await.unwrap();
    assert!(conn.db().as_clickhouse().is_some());

    conn.close().await;
    assert!(conn.is_closed());

    let err = conn.ping().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Closed);
    assert_eq!(err.to_string(), "database is closed");
}
