//! Statement handles.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::driver::{Connection, DriverStatement, GeneratedKeys};
use crate::error::{Error, Result};

enum State {
    Open {
        statement: Box<dyn DriverStatement>,
        // Cursors hold a weak reference; dropping this invalidates them.
        lease: Rc<()>,
    },
    Closed,
}

/// A live prepared statement.
///
/// A handle starts `Open` and moves to `Closed` exactly once, either through
/// [`StatementHandle::close`] or through the session's bulk release. Closing
/// an already closed handle is a no-op; every other operation on a closed
/// handle fails with [`Error::ClosedHandle`].
///
/// Each bind advances the handle's position counter by one and binds at the
/// new position, so the n-th bind fills the n-th `?` placeholder.
pub struct StatementHandle {
    sql: String,
    position: usize,
    state: State,
}

impl StatementHandle {
    /// Prepares `sql` on the connection.
    pub(crate) fn prepare(
        connection: &mut dyn Connection,
        sql: &str,
        keys: GeneratedKeys,
    ) -> Result<Self> {
        debug!(sql = %sql, ?keys, "Preparing statement");
        let statement = connection
            .prepare(sql, keys)
            .map_err(|source| Error::StatementCreation {
                sql: sql.to_string(),
                source,
            })?;
        Ok(Self {
            sql: sql.to_string(),
            position: 0,
            state: State::Open {
                statement,
                lease: Rc::new(()),
            },
        })
    }

    /// Returns the SQL text this handle was prepared from.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the position of the last bound parameter (0 before any bind).
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns true once the handle has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    fn statement(&mut self) -> Result<&mut dyn DriverStatement> {
        match &mut self.state {
            State::Open { statement, .. } => Ok(statement.as_mut()),
            State::Closed => Err(Error::ClosedHandle),
        }
    }

    fn advance(&mut self) -> Result<(usize, &mut dyn DriverStatement)> {
        match &mut self.state {
            State::Open { statement, .. } => {
                self.position += 1;
                Ok((self.position, statement.as_mut()))
            }
            State::Closed => Err(Error::ClosedHandle),
        }
    }

    /// Binds a 32-bit integer at the next position.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or when the driver rejects the value.
    pub fn bind_int(&mut self, value: i32) -> Result<&mut Self> {
        let (index, statement) = self.advance()?;
        trace!(index, value, "Binding int");
        statement.bind_int(index, value)?;
        Ok(self)
    }

    /// Binds a 64-bit integer at the next position.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or when the driver rejects the value.
    pub fn bind_long(&mut self, value: i64) -> Result<&mut Self> {
        let (index, statement) = self.advance()?;
        trace!(index, value, "Binding long");
        statement.bind_long(index, value)?;
        Ok(self)
    }

    /// Binds a single-precision float at the next position.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or when the driver rejects the value.
    pub fn bind_float(&mut self, value: f32) -> Result<&mut Self> {
        let (index, statement) = self.advance()?;
        trace!(index, value, "Binding float");
        statement.bind_float(index, value)?;
        Ok(self)
    }

    /// Binds a double-precision float at the next position.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or when the driver rejects the value.
    pub fn bind_double(&mut self, value: f64) -> Result<&mut Self> {
        let (index, statement) = self.advance()?;
        trace!(index, value, "Binding double");
        statement.bind_double(index, value)?;
        Ok(self)
    }

    /// Binds a string at the next position.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or when the driver rejects the value.
    pub fn bind_string(&mut self, value: &str) -> Result<&mut Self> {
        let (index, statement) = self.advance()?;
        trace!(index, value, "Binding string");
        statement.bind_string(index, value)?;
        Ok(self)
    }

    /// Runs the statement as a read.
    ///
    /// The returned cursor is only readable while this handle stays open.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or with the backend's execution error.
    pub fn execute_query(&mut self) -> Result<Cursor> {
        let State::Open { statement, lease } = &mut self.state else {
            return Err(Error::ClosedHandle);
        };
        let rows = statement.execute_query()?;
        Ok(Cursor::new(rows, Rc::downgrade(lease)))
    }

    /// Runs the statement as a write and returns the affected row count.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or with the backend's execution error.
    pub fn execute_update(&mut self) -> Result<u64> {
        let count = self.statement()?.execute_update()?;
        debug!(sql = %self.sql, rows = count, "Statement executed");
        Ok(count)
    }

    /// Returns the keys generated by the most recent write.
    ///
    /// The cursor is empty when nothing was generated.
    ///
    /// # Errors
    ///
    /// Fails on a closed handle or with the backend's error.
    pub fn generated_keys(&mut self) -> Result<Cursor> {
        let State::Open { statement, lease } = &mut self.state else {
            return Err(Error::ClosedHandle);
        };
        let keys = statement.generated_keys()?;
        Ok(Cursor::new(keys, Rc::downgrade(lease)))
    }

    /// Closes the handle, invalidating every cursor it produced.
    ///
    /// The handle is `Closed` afterwards even if the driver reports an
    /// error; the release is never attempted twice.
    ///
    /// # Errors
    ///
    /// Returns the driver's error from the first close.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open {
                mut statement,
                lease,
            } => {
                drop(lease);
                debug!(sql = %self.sql, "Closing statement");
                statement.close()?;
                Ok(())
            }
            State::Closed => Ok(()),
        }
    }
}

impl fmt::Debug for StatementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementHandle")
            .field("sql", &self.sql)
            .field("position", &self.position)
            .field("closed", &self.is_closed())
            .finish()
    }
}
