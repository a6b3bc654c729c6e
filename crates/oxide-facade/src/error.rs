//! Error types for the session layer.

use oxide_facade_core::builder::UnsupportedType;
use oxide_facade_core::schema::SchemaError;
use thiserror::Error;

/// Boxed error produced by a database backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by a driver (the Connection Provider and its statements).
#[derive(Debug, Error)]
pub enum DriverError {
    /// The number of bound arguments does not match the statement's
    /// placeholders.
    #[error("parameter count mismatch: statement expects {expected}, {supplied} bound")]
    ParameterMismatch {
        /// Placeholders in the statement.
        expected: usize,
        /// Arguments bound.
        supplied: usize,
    },

    /// The underlying connection has already been closed.
    #[error("connection is closed")]
    ConnectionClosed,

    /// Error reported by the backend.
    #[error("{0}")]
    Backend(#[source] BoxError),
}

impl DriverError {
    /// Wraps a backend error.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }
}

/// Errors returned by sessions, statement handles and cursors.
#[derive(Debug, Error)]
pub enum Error {
    /// The table descriptor cannot be resolved to a table name.
    #[error(transparent)]
    Configuration(#[from] SchemaError),

    /// The connection could not be established.
    #[error("failed to connect to database: {0}")]
    Connection(#[source] DriverError),

    /// The backend rejected SQL text at prepare time.
    #[error("failed to prepare statement `{sql}`: {source}")]
    StatementCreation {
        /// The rejected SQL.
        sql: String,
        /// The driver error.
        source: DriverError,
    },

    /// A bind argument is not one of the supported scalar types.
    #[error(transparent)]
    UnsupportedArgumentType(#[from] UnsupportedType),

    /// An operation was attempted on a closed statement handle.
    #[error("statement handle is closed")]
    ClosedHandle,

    /// An aggregate query produced no row at all.
    #[error("{function} query returned no row")]
    EmptyResult {
        /// The aggregate function name.
        function: String,
    },

    /// A row has no such column.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A column value cannot be read as the requested type.
    #[error("column {column} holds {found}, which cannot be read as {expected}")]
    TypeMismatch {
        /// The column that was read.
        column: String,
        /// The requested type.
        expected: &'static str,
        /// The kind of value actually stored.
        found: &'static str,
    },

    /// Error reported while executing a statement.
    #[error("database error: {0}")]
    Driver(#[from] DriverError),

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<Error>),
}

impl Error {
    /// Folds a list of errors into a single result: `Ok` when empty, the
    /// error itself when there is one, [`Error::Multiple`] otherwise.
    pub(crate) fn collect(mut errors: Vec<Self>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
