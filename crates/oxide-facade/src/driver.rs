//! Driver traits.
//!
//! A driver is the Connection Provider: it hands the session an already
//! established [`Connection`], which prepares SQL text into
//! [`DriverStatement`]s. Everything above this seam is backend-agnostic.
//!
//! Drivers report failures as [`DriverError`]; the session maps them onto
//! its own error taxonomy (prepare failures become
//! [`Error::StatementCreation`](crate::Error::StatementCreation), the rest
//! pass through as [`Error::Driver`](crate::Error::Driver)).

use oxide_facade_core::dialect::Dialect;

use crate::cursor::RowSet;
use crate::error::DriverError;

/// Whether a prepared statement should retain auto-generated keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratedKeys {
    /// Keep generated keys for [`DriverStatement::generated_keys`].
    Return,
    /// Do not track generated keys.
    #[default]
    Omit,
}

/// An open, authenticated database connection.
pub trait Connection {
    /// Prepares SQL text into a statement.
    ///
    /// # Errors
    ///
    /// Fails if the backend rejects the text (syntax error, unknown table or
    /// column) or the connection is unusable.
    fn prepare(
        &mut self,
        sql: &str,
        keys: GeneratedKeys,
    ) -> Result<Box<dyn DriverStatement>, DriverError>;

    /// Returns the dialect spoken by this connection.
    fn dialect(&self) -> &dyn Dialect;

    /// Closes the connection. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the connection does not shut down
    /// cleanly.
    fn close(&mut self) -> Result<(), DriverError>;
}

/// One prepared statement.
///
/// Bind indexes are 1-based. The driver checks the number of bound
/// arguments against the statement's placeholders when it executes, and
/// reports a difference as [`DriverError::ParameterMismatch`].
pub trait DriverStatement {
    /// Binds a 32-bit integer.
    ///
    /// # Errors
    ///
    /// Fails if the backend rejects the binding.
    fn bind_int(&mut self, index: usize, value: i32) -> Result<(), DriverError>;

    /// Binds a 64-bit integer.
    ///
    /// # Errors
    ///
    /// Fails if the backend rejects the binding.
    fn bind_long(&mut self, index: usize, value: i64) -> Result<(), DriverError>;

    /// Binds a single-precision float.
    ///
    /// # Errors
    ///
    /// Fails if the backend rejects the binding.
    fn bind_float(&mut self, index: usize, value: f32) -> Result<(), DriverError>;

    /// Binds a double-precision float.
    ///
    /// # Errors
    ///
    /// Fails if the backend rejects the binding.
    fn bind_double(&mut self, index: usize, value: f64) -> Result<(), DriverError>;

    /// Binds a string.
    ///
    /// # Errors
    ///
    /// Fails if the backend rejects the binding.
    fn bind_string(&mut self, index: usize, value: &str) -> Result<(), DriverError>;

    /// Runs the statement as a read.
    ///
    /// # Errors
    ///
    /// Returns the backend's execution error.
    fn execute_query(&mut self) -> Result<RowSet, DriverError>;

    /// Runs the statement as a write and returns the affected row count.
    ///
    /// # Errors
    ///
    /// Returns the backend's execution error.
    fn execute_update(&mut self) -> Result<u64, DriverError>;

    /// Returns the keys generated by the most recent write, or an empty row
    /// set when there are none.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    fn generated_keys(&mut self) -> Result<RowSet, DriverError>;

    /// Releases the statement.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    fn close(&mut self) -> Result<(), DriverError>;
}
