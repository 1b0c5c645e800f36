//! Pool sizing and connection age settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Idle connection cap used when none is given.
pub const DEFAULT_MAX_IDLE_CONNECTION: i32 = 10;

/// Open connection cap used when none is given.
pub const DEFAULT_MAX_OPEN_CONNECTION: i32 = 10;

/// Connection lifetime used when none is given.
pub const DEFAULT_CONN_MAX_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Connection idle time used when none is given.
pub const DEFAULT_CONN_MAX_IDLE_TIME: Duration = Duration::from_secs(10 * 60);

/// Upper bound for [`PoolConfig::conn_max_lifetime`].
pub const MAX_CONN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound for [`PoolConfig::conn_max_idle_time`].
pub const MAX_CONN_IDLE_TIME: Duration = Duration::from_secs(60 * 60);

/// Connection pool knobs forwarded to the driver.
///
/// Zero or negative values mean "use the default". Call
/// [`normalize`](Self::normalize) before handing the values to a driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Maximum number of idle connections.
    pub max_idle_connection: i32,
    /// Maximum number of open connections.
    pub max_open_connection: i32,
    /// Maximum age of a connection.
    #[serde(with = "humantime_serde")]
    pub conn_max_lifetime: Duration,
    /// Maximum time a connection may sit idle.
    #[serde(with = "humantime_serde")]
    pub conn_max_idle_time: Duration,
}

impl PoolConfig {
    /// Set the idle connection cap.
    pub fn with_max_idle_connection(mut self, n: i32) -> Self {
        self.max_idle_connection = n;
        self
    }

    /// Set the open connection cap.
    pub fn with_max_open_connection(mut self, n: i32) -> Self {
        self.max_open_connection = n;
        self
    }

    /// Set the connection lifetime.
    pub fn with_conn_max_lifetime(mut self, lifetime: Duration) -> Self {
        self.conn_max_lifetime = lifetime;
        self
    }

    /// Set the connection idle time.
    pub fn with_conn_max_idle_time(mut self, idle: Duration) -> Self {
        self.conn_max_idle_time = idle;
        self
    }

    /// Replace unset values with defaults and clamp out-of-range ones.
    ///
    /// Rules, applied in order:
    ///
    /// 1. `max_idle_connection <= 0` becomes [`DEFAULT_MAX_IDLE_CONNECTION`].
    /// 2. `max_open_connection <= 0` becomes [`DEFAULT_MAX_OPEN_CONNECTION`].
    /// 3. `max_open_connection` is raised to `max_idle_connection` if lower.
    /// 4. A zero lifetime becomes [`DEFAULT_CONN_MAX_LIFETIME`]; above
    ///    [`MAX_CONN_LIFETIME`] it is clamped.
    /// 5. A zero idle time becomes [`DEFAULT_CONN_MAX_IDLE_TIME`]; above
    ///    [`MAX_CONN_IDLE_TIME`] it is clamped.
    ///
    /// Applying it to an already normalized value changes nothing.
    pub fn normalize(&mut self) {
        if self.max_idle_connection <= 0 {
            self.max_idle_connection = DEFAULT_MAX_IDLE_CONNECTION;
        }

        if self.max_open_connection <= 0 {
            self.max_open_connection = DEFAULT_MAX_OPEN_CONNECTION;
        }

        // Open is only ever raised.
        if self.max_open_connection < self.max_idle_connection {
            debug!(
                max_open = self.max_open_connection,
                max_idle = self.max_idle_connection,
                "Raising max open connections to max idle connections"
            );
            self.max_open_connection = self.max_idle_connection;
        }

        if self.conn_max_lifetime.is_zero() {
            self.conn_max_lifetime = DEFAULT_CONN_MAX_LIFETIME;
        } else if self.conn_max_lifetime > MAX_CONN_LIFETIME {
            warn!(
                requested = ?self.conn_max_lifetime,
                limit = ?MAX_CONN_LIFETIME,
                "Connection max lifetime clamped"
            );
            self.conn_max_lifetime = MAX_CONN_LIFETIME;
        }

        if self.conn_max_idle_time.is_zero() {
            self.conn_max_idle_time = DEFAULT_CONN_MAX_IDLE_TIME;
        } else if self.conn_max_idle_time > MAX_CONN_IDLE_TIME {
            warn!(
                requested = ?self.conn_max_idle_time,
                limit = ?MAX_CONN_IDLE_TIME,
                "Connection max idle time clamped"
            );
            self.conn_max_idle_time = MAX_CONN_IDLE_TIME;
        }
    }

    /// Return a normalized copy.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HOUR: Duration = Duration::from_secs(60 * 60);
    const MINUTE: Duration = Duration::from_secs(60);
    const NANO: Duration = Duration::from_nanos(1);

    fn defaults() -> PoolConfig {
        PoolConfig {
            max_idle_connection: DEFAULT_MAX_IDLE_CONNECTION,
            max_open_connection: DEFAULT_MAX_OPEN_CONNECTION,
            conn_max_lifetime: DEFAULT_CONN_MAX_LIFETIME,
            conn_max_idle_time: DEFAULT_CONN_MAX_IDLE_TIME,
        }
    }

    #[test]
    fn test_all_zero_uses_defaults() {
        assert_eq!(PoolConfig::default().normalized(), defaults());
    }

    #[test]
    fn test_negative_counts_use_defaults() {
        let pool = PoolConfig::default()
            .with_max_idle_connection(-5)
            .with_max_open_connection(-10)
            .normalized();
        assert_eq!(pool, defaults());
    }

    #[test]
    fn test_open_raised_to_idle() {
        let pool = PoolConfig::default()
            .with_max_idle_connection(20)
            .with_max_open_connection(10)
            .normalized();
        assert_eq!(pool.max_idle_connection, 20);
        assert_eq!(pool.max_open_connection, 20);
        assert_eq!(pool.conn_max_lifetime, DEFAULT_CONN_MAX_LIFETIME);
        assert_eq!(pool.conn_max_idle_time, DEFAULT_CONN_MAX_IDLE_TIME);
    }

    #[test]
    fn test_open_adjustment_cases() {
        let cases = [
            ("open above idle", 10, 20, 20),
            ("open equals idle", 10, 10, 10),
            ("open below idle", 20, 10, 20),
            ("open unset, idle set", 15, 0, 15),
            ("idle unset, open below default", 0, 5, DEFAULT_MAX_IDLE_CONNECTION),
        ];

        for (name, idle, open, expected) in cases {
            let pool = PoolConfig::default()
                .with_max_idle_connection(idle)
                .with_max_open_connection(open)
                .normalized();
            assert_eq!(pool.max_open_connection, expected, "{name}");
        }
    }

    #[test]
    fn test_lifetime_clamped() {
        let pool = PoolConfig::default()
            .with_conn_max_lifetime(48 * HOUR)
            .normalized();
        assert_eq!(pool.conn_max_lifetime, MAX_CONN_LIFETIME);
    }

    #[test]
    fn test_idle_time_clamped() {
        let pool = PoolConfig::default()
            .with_conn_max_idle_time(2 * HOUR)
            .normalized();
        assert_eq!(pool.conn_max_idle_time, MAX_CONN_IDLE_TIME);
    }

    #[test]
    fn test_values_within_limits_unchanged() {
        let pool = PoolConfig {
            max_idle_connection: 15,
            max_open_connection: 25,
            conn_max_lifetime: 12 * HOUR,
            conn_max_idle_time: 30 * MINUTE,
        };
        assert_eq!(pool.normalized(), pool);
    }

    #[test]
    fn test_boundaries() {
        let at_limit = PoolConfig {
            max_idle_connection: 1,
            max_open_connection: 1,
            conn_max_lifetime: 24 * HOUR,
            conn_max_idle_time: HOUR,
        };
        assert_eq!(at_limit.normalized(), at_limit);

        let over = PoolConfig {
            conn_max_lifetime: 24 * HOUR + NANO,
            conn_max_idle_time: HOUR + NANO,
            ..at_limit
        }
        .normalized();
        assert_eq!(over.conn_max_lifetime, 24 * HOUR);
        assert_eq!(over.conn_max_idle_time, HOUR);
    }

    #[test]
    fn test_mixed_adjustments() {
        let pool = PoolConfig {
            max_idle_connection: 0,
            max_open_connection: 5,
            conn_max_lifetime: 48 * HOUR,
            conn_max_idle_time: Duration::ZERO,
        }
        .normalized();

        assert_eq!(
            pool,
            PoolConfig {
                max_idle_connection: DEFAULT_MAX_IDLE_CONNECTION,
                max_open_connection: DEFAULT_MAX_IDLE_CONNECTION.max(5),
                conn_max_lifetime: MAX_CONN_LIFETIME,
                conn_max_idle_time: DEFAULT_CONN_MAX_IDLE_TIME,
            }
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            PoolConfig::default(),
            PoolConfig {
                max_idle_connection: 20,
                max_open_connection: 3,
                conn_max_lifetime: 100 * HOUR,
                conn_max_idle_time: 5 * HOUR,
            },
            PoolConfig {
                max_idle_connection: -1,
                max_open_connection: 50,
                conn_max_lifetime: NANO,
                conn_max_idle_time: HOUR + NANO,
            },
        ];

        for input in inputs {
            let once = input.normalized();
            assert_eq!(once.normalized(), once);

            assert!(once.max_idle_connection >= 1);
            assert!(once.max_open_connection >= once.max_idle_connection);
            assert!(!once.conn_max_lifetime.is_zero() && once.conn_max_lifetime <= MAX_CONN_LIFETIME);
            assert!(!once.conn_max_idle_time.is_zero() && once.conn_max_idle_time <= MAX_CONN_IDLE_TIME);
        }
    }
}
