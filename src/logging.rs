//! Opt-in log output for dbkit's `tracing` events.
//!
//! The library only emits events (pool opened and closed, pool settings
//! clamped, connection strings built). Applications that already install a
//! subscriber get them for free. Others can call [`init`] with the
//! `tracing-subscriber` feature enabled:
//!
//! | Variable           | Values                                  |
//! |--------------------|-----------------------------------------|
//! | `DBKIT_DEBUG`      | `1`, `true`, `yes` turn on `debug`      |
//! | `DBKIT_LOG_LEVEL`  | `trace`, `debug`, `info`, `warn`, `error` |
//! | `DBKIT_LOG_FORMAT` | `json` (default), `pretty`, `compact`   |
//!
//! `DBKIT_LOG_LEVEL` wins over `DBKIT_DEBUG`. With neither set nothing is
//! installed.

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use tracing::Level;

/// Targets the installed filter lets through.
pub const LOG_TARGETS: &[&str] = &["dbkit", "dbkit_config", "dbkit_dialects", "sqlx"];

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human-readable.
    Pretty,
    /// Single-line, human-readable.
    Compact,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(()),
        }
    }
}

/// What [`init`] would install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level, or `None` when logging is off.
    pub level: Option<Level>,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Read the `DBKIT_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve settings through `lookup`, which maps a variable name to its value.
    ///
    /// An unparseable `DBKIT_LOG_LEVEL` falls back to what `DBKIT_DEBUG` says,
    /// and an unparseable format falls back to JSON.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debug = lookup("DBKIT_DEBUG").is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });
        let explicit = lookup("DBKIT_LOG_LEVEL").and_then(|v| v.trim().parse::<Level>().ok());

        let level = match explicit {
            Some(level) => Some(level),
            None if debug => Some(Level::DEBUG),
            None => None,
        };
        let format = lookup("DBKIT_LOG_FORMAT")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self { level, format }
    }
}

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install a subscriber configured from the environment.
///
/// Returns whether a subscriber is in place after the call. Only the first
/// call does any work.
pub fn init() -> bool {
    init_with(LogSettings::from_env())
}

/// Like [`init`], with explicit settings.
pub fn init_with(settings: LogSettings) -> bool {
    *INSTALLED.get_or_init(|| install(settings))
}

#[cfg(feature = "tracing-subscriber")]
fn install(settings: LogSettings) -> bool {
    use tracing_subscriber::filter::Targets;
    use tracing_subscriber::{fmt, prelude::*};

    let Some(level) = settings.level else {
        return false;
    };

    let targets = LOG_TARGETS
        .iter()
        .fold(Targets::new(), |t, target| t.with_target(*target, level));
    let registry = tracing_subscriber::registry().with(targets);

    let installed = match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    }
    .is_ok();

    if installed {
        tracing::debug!(%level, format = ?settings.format, "dbkit logging installed");
    }
    installed
}

#[cfg(not(feature = "tracing-subscriber"))]
fn install(_settings: LogSettings) -> bool {
    false
}
