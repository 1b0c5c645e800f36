//! Error types for configuration, opening and pool usage.

use miette::Diagnostic;
use thiserror::Error;

use crate::dialect::DialectKind;

/// Boxed error returned by a driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for dbkit operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur while validating, opening or using a connection.
#[derive(Error, Debug, Diagnostic)]
pub enum DbError {
    /// Host is empty or whitespace.
    #[error("host is required")]
    #[diagnostic(code(dbkit::config::missing_host))]
    MissingHost,

    /// Port is outside `1..=65535`.
    #[error("port must be between 1 and 65535")]
    #[diagnostic(code(dbkit::config::invalid_port))]
    InvalidPort,

    /// Username is empty or whitespace.
    #[error("username is required")]
    #[diagnostic(code(dbkit::config::missing_username))]
    MissingUsername,

    /// Database name is empty or whitespace.
    #[error("database is required")]
    #[diagnostic(code(dbkit::config::missing_database))]
    MissingDatabase,

    /// Unknown PostgreSQL SSL mode under a strict parse.
    #[error("invalid postgresql ssl mode `{0}`")]
    #[diagnostic(
        code(dbkit::config::invalid_ssl_mode),
        help("expected one of: disable, allow, prefer, require, verify-ca, verify-full")
    )]
    InvalidSslMode(String),

    /// The driver failed to open a pool.
    #[error("failed to open {dialect} connection: {source}")]
    #[diagnostic(code(dbkit::open::failed))]
    Open {
        dialect: DialectKind,
        #[source]
        source: BoxError,
    },

    /// An error surfaced by the driver on an opened pool.
    #[error("{source}")]
    #[diagnostic(code(dbkit::driver::error))]
    Driver {
        #[source]
        source: BoxError,
    },

    /// The handle was closed and the driver has no closed state of its own.
    #[error("database is closed")]
    #[diagnostic(code(dbkit::driver::closed))]
    Closed,

    /// Error reading a settings file.
    #[error("failed to read settings file: {path}")]
    #[diagnostic(code(dbkit::settings::io_error))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse settings TOML: {source}")]
    #[diagnostic(code(dbkit::settings::toml_error))]
    Toml {
        #[source]
        source: toml::de::Error,
    },

    /// Settings are well-formed TOML but unusable.
    #[error("settings error: {message}")]
    #[diagnostic(code(dbkit::settings::invalid))]
    Settings { message: String },
}

/// Kind of a [`DbError`], for matching without inspecting payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`DbError::MissingHost`].
    MissingHost,
    /// See [`DbError::InvalidPort`].
    InvalidPort,
    /// See [`DbError::MissingUsername`].
    MissingUsername,
    /// See [`DbError::MissingDatabase`].
    MissingDatabase,
    /// See [`DbError::InvalidSslMode`].
    InvalidSslMode,
    /// See [`DbError::Open`].
    Open,
    /// See [`DbError::Driver`].
    Driver,
    /// See [`DbError::Closed`].
    Closed,
    /// Settings file could not be read or parsed.
    Settings,
}

impl DbError {
    /// Wrap a driver open failure with the dialect name.
    pub fn open(dialect: DialectKind, source: impl Into<BoxError>) -> Self {
        Self::Open {
            dialect,
            source: source.into(),
        }
    }

    /// Wrap an error surfaced by the driver.
    pub fn driver(source: impl Into<BoxError>) -> Self {
        Self::Driver {
            source: source.into(),
        }
    }

    /// Create a settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingHost => ErrorKind::MissingHost,
            Self::InvalidPort => ErrorKind::InvalidPort,
            Self::MissingUsername => ErrorKind::MissingUsername,
            Self::MissingDatabase => ErrorKind::MissingDatabase,
            Self::InvalidSslMode(_) => ErrorKind::InvalidSslMode,
            Self::Open { .. } => ErrorKind::Open,
            Self::Driver { .. } => ErrorKind::Driver,
            Self::Closed => ErrorKind::Closed,
            Self::Io { .. } | Self::Toml { .. } | Self::Settings { .. } => ErrorKind::Settings,
        }
    }

    /// Check if this error was raised by local validation, before any I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MissingHost
                | ErrorKind::InvalidPort
                | ErrorKind::MissingUsername
                | ErrorKind::MissingDatabase
                | ErrorKind::InvalidSslMode
        )
    }
}
