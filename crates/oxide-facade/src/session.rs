//! The session facade.
//!
//! A [`Session`] owns one connection and the registry of every statement
//! opened through it. Each CRUD operation resolves the table name, builds
//! SQL text, opens and registers a statement handle, binds the caller's
//! predicate arguments in order, and executes.
//!
//! # Example
//!
//! ```ignore
//! use oxide_facade::{Session, SqlValue, ValueMapping};
//!
//! let mut session = Session::new(connection);
//! session.create(&users)?;
//!
//! let id = session.insert(&users, &ValueMapping::new().with(&name, "alice"))?;
//! let updated = session.update(
//!     &users,
//!     &ValueMapping::new().with(&score, 90_i32),
//!     Some("name = ?"),
//!     &["alice".into()],
//! )?;
//!
//! let mut rows = session.select_all(&users)?;
//! while let Some(row) = rows.next_row()? {
//!     println!("{}", row.get_string("name")?);
//! }
//!
//! session.close()?;
//! ```
//!
//! # Threading
//!
//! A session is meant for one caller at a time and is not `Send`. Callers
//! that share a session across threads must provide their own
//! synchronization around it.

use oxide_facade_core::builder::{
    aggregate_sql, column_predicate, create_table_sql, delete_sql, drop_table_sql, insert_sql,
    select_sql, update_sql, AggregateFunction, SqlValue, ValueMapping,
};
use oxide_facade_core::schema::{resolve, ColumnSpec, TableDescriptor};
use tracing::{debug, info, warn};

use crate::binder::bind_all;
use crate::cursor::Cursor;
use crate::driver::{Connection, GeneratedKeys};
use crate::error::{DriverError, Error, Result};
use crate::registry::StatementRegistry;
use crate::statement::StatementHandle;

/// Returned by [`Session::insert`] when no key was generated.
pub const NO_GENERATED_KEY: i64 = -1;

/// Caller-facing entry point owning a connection and its statements.
pub struct Session {
    connection: Box<dyn Connection>,
    registry: StatementRegistry,
    closed: bool,
}

impl Session {
    /// Creates a session over an established connection.
    #[must_use]
    pub fn new(connection: Box<dyn Connection>) -> Self {
        info!(dialect = connection.dialect().name(), "Session opened");
        Self {
            connection,
            registry: StatementRegistry::new(),
            closed: false,
        }
    }

    /// Creates a session from a connection provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the provider fails.
    pub fn connect<F>(provider: F) -> Result<Self>
    where
        F: FnOnce() -> std::result::Result<Box<dyn Connection>, DriverError>,
    {
        let connection = provider().map_err(Error::Connection)?;
        Ok(Self::new(connection))
    }

    /// Returns the number of statement handles currently registered.
    #[must_use]
    pub fn open_statements(&self) -> usize {
        self.registry.len()
    }

    /// Prepares arbitrary SQL, registers the handle and returns it.
    ///
    /// The statement retains generated keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StatementCreation`] if the backend rejects the SQL.
    pub fn execute(&mut self, sql: &str) -> Result<&mut StatementHandle> {
        self.open(sql, GeneratedKeys::Return)
    }

    fn open(&mut self, sql: &str, keys: GeneratedKeys) -> Result<&mut StatementHandle> {
        let handle = StatementHandle::prepare(self.connection.as_mut(), sql, keys)?;
        Ok(self.registry.register(handle))
    }

    fn query(&mut self, sql: &str, args: &[SqlValue]) -> Result<Cursor> {
        let handle = self.open(sql, GeneratedKeys::Omit)?;
        bind_all(handle, args)?;
        handle.execute_query()
    }

    fn write(&mut self, sql: &str, args: &[SqlValue]) -> Result<u64> {
        let handle = self.open(sql, GeneratedKeys::Omit)?;
        bind_all(handle, args)?;
        handle.execute_update()
    }

    /// Selects the given columns of the rows matching `predicate`.
    ///
    /// `args` fill the predicate's `?` placeholders left to right.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved, the SQL is rejected or the
    /// query fails.
    pub fn select<C: AsRef<str>>(
        &mut self,
        table: &TableDescriptor,
        columns: &[C],
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<Cursor> {
        let sql = select_sql(resolve(table)?, columns, predicate);
        self.query(&sql, args)
    }

    /// Selects every column of the rows matching `predicate`.
    ///
    /// # Errors
    ///
    /// See [`Session::select`].
    pub fn select_all_columns(
        &mut self,
        table: &TableDescriptor,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<Cursor> {
        self.select(table, &["*"], predicate, args)
    }

    /// Selects every column of the rows where `column` equals `value`.
    ///
    /// # Errors
    ///
    /// See [`Session::select`].
    pub fn select_by_column(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        value: impl Into<SqlValue>,
    ) -> Result<Cursor> {
        let predicate = column_predicate(column.name());
        self.select_all_columns(table, Some(&predicate), &[value.into()])
    }

    /// Selects every row and column of the table.
    ///
    /// # Errors
    ///
    /// See [`Session::select`].
    pub fn select_all(&mut self, table: &TableDescriptor) -> Result<Cursor> {
        self.select_all_columns(table, None, &[])
    }

    /// Updates the rows matching `predicate` and returns how many changed.
    ///
    /// Values are embedded as literals; see
    /// [`SqlValue::to_sql_literal`].
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved, the SQL is rejected or the
    /// update fails.
    pub fn update(
        &mut self,
        table: &TableDescriptor,
        values: &ValueMapping,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<u64> {
        let sql = update_sql(resolve(table)?, values, predicate);
        self.write(&sql, args)
    }

    /// Updates the rows where `column` equals `value`.
    ///
    /// # Errors
    ///
    /// See [`Session::update`].
    pub fn update_by_column(
        &mut self,
        table: &TableDescriptor,
        values: &ValueMapping,
        column: &ColumnSpec,
        value: impl Into<SqlValue>,
    ) -> Result<u64> {
        let predicate = column_predicate(column.name());
        self.update(table, values, Some(&predicate), &[value.into()])
    }

    /// Inserts one row and returns its generated key.
    ///
    /// Returns [`NO_GENERATED_KEY`] when the write affected no row (keys are
    /// not consulted then) or when the backend generated no key.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved, the SQL is rejected or the
    /// insert fails.
    pub fn insert(&mut self, table: &TableDescriptor, values: &ValueMapping) -> Result<i64> {
        let sql = insert_sql(resolve(table)?, values);
        let handle = self.open(&sql, GeneratedKeys::Return)?;
        if handle.execute_update()? == 0 {
            return Ok(NO_GENERATED_KEY);
        }
        let mut keys = handle.generated_keys()?;
        match keys.next_row()? {
            Some(row) => row.get_long(0_usize),
            None => Ok(NO_GENERATED_KEY),
        }
    }

    /// Deletes the rows matching `predicate` and returns how many went.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved, the SQL is rejected or the
    /// delete fails.
    pub fn delete(
        &mut self,
        table: &TableDescriptor,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<u64> {
        let sql = delete_sql(resolve(table)?, predicate);
        self.write(&sql, args)
    }

    /// Deletes the rows where `column` equals `value`.
    ///
    /// # Errors
    ///
    /// See [`Session::delete`].
    pub fn delete_by_column(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        value: impl Into<SqlValue>,
    ) -> Result<u64> {
        let predicate = column_predicate(column.name());
        self.delete(table, Some(&predicate), &[value.into()])
    }

    /// Deletes every row of the table.
    ///
    /// # Errors
    ///
    /// See [`Session::delete`].
    pub fn empty(&mut self, table: &TableDescriptor) -> Result<u64> {
        self.delete(table, None, &[])
    }

    /// Creates the table from its descriptor.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved or the backend rejects the
    /// definition.
    pub fn create(&mut self, table: &TableDescriptor) -> Result<()> {
        let sql = create_table_sql(resolve(table)?, table.columns());
        self.write(&sql, &[]).map(|_| ())
    }

    /// Drops the table.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved or does not exist.
    pub fn drop(&mut self, table: &TableDescriptor) -> Result<()> {
        let sql = drop_table_sql(resolve(table)?);
        self.write(&sql, &[]).map(|_| ())
    }

    /// Returns true if the table exists.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot be resolved or the lookup fails.
    pub fn table_exists(&mut self, table: &TableDescriptor) -> Result<bool> {
        let name = resolve(table)?;
        let sql = self.connection.dialect().table_exists_sql();
        let mut cursor = self.query(sql, &[SqlValue::from(name)])?;
        Ok(cursor.next_row()?.is_some())
    }

    /// Returns true if at least one row matches `predicate`.
    ///
    /// # Errors
    ///
    /// See [`Session::select`].
    pub fn record_exists(
        &mut self,
        table: &TableDescriptor,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<bool> {
        let mut cursor = self.select_all_columns(table, predicate, args)?;
        Ok(cursor.next_row()?.is_some())
    }

    /// Returns true if a row exists where `column` equals `value`.
    ///
    /// # Errors
    ///
    /// See [`Session::select`].
    pub fn record_exists_by_column(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        value: impl Into<SqlValue>,
    ) -> Result<bool> {
        let predicate = column_predicate(column.name());
        self.record_exists(table, Some(&predicate), &[value.into()])
    }

    /// Runs an aggregate over `column` and reads the result as an integer.
    ///
    /// A NULL result (for example `sum` over no rows) reads as 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] if the query yields no row, otherwise
    /// fails like [`Session::select`].
    pub fn aggregate(
        &mut self,
        function: AggregateFunction,
        table: &TableDescriptor,
        column: &str,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<i64> {
        let sql = aggregate_sql(function.as_str(), resolve(table)?, column, predicate);
        let mut cursor = self.query(&sql, args)?;
        let row = cursor.next_row()?.ok_or_else(|| Error::EmptyResult {
            function: function.to_string(),
        })?;
        row.get_long(0_usize)
    }

    /// Sums `column` over the rows matching `predicate`.
    ///
    /// # Errors
    ///
    /// See [`Session::aggregate`].
    pub fn sum(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<i64> {
        self.aggregate(AggregateFunction::Sum, table, column.name(), predicate, args)
    }

    /// Returns the largest `column` value among the matching rows.
    ///
    /// # Errors
    ///
    /// See [`Session::aggregate`].
    pub fn max(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<i64> {
        self.aggregate(AggregateFunction::Max, table, column.name(), predicate, args)
    }

    /// Returns the smallest `column` value among the matching rows.
    ///
    /// # Errors
    ///
    /// See [`Session::aggregate`].
    pub fn min(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<i64> {
        self.aggregate(AggregateFunction::Min, table, column.name(), predicate, args)
    }

    /// Counts every row of the table.
    ///
    /// # Errors
    ///
    /// See [`Session::aggregate`].
    pub fn count(&mut self, table: &TableDescriptor) -> Result<i64> {
        self.aggregate(AggregateFunction::Count, table, "*", None, &[])
    }

    /// Counts the non-NULL `column` values among the matching rows.
    ///
    /// # Errors
    ///
    /// See [`Session::aggregate`].
    pub fn count_column(
        &mut self,
        table: &TableDescriptor,
        column: &ColumnSpec,
        predicate: Option<&str>,
        args: &[SqlValue],
    ) -> Result<i64> {
        self.aggregate(AggregateFunction::Count, table, column.name(), predicate, args)
    }

    /// Closes every registered statement, earliest first, and empties the
    /// registry. The session stays usable.
    ///
    /// # Errors
    ///
    /// Reports the statements that failed to close; the others are closed
    /// regardless.
    pub fn clear(&mut self) -> Result<()> {
        self.registry.release_all()
    }

    /// Closes the connection, then releases every registered statement.
    ///
    /// # Errors
    ///
    /// Reports a failed connection close and any failed statement closes.
    /// Statements are released even when the connection fails to close.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut errors = Vec::new();
        if let Err(err) = self.connection.close() {
            errors.push(Error::Driver(err));
        }
        match self.registry.release_all() {
            Ok(()) => {}
            Err(Error::Multiple(failed)) => errors.extend(failed),
            Err(err) => errors.push(err),
        }
        info!(failures = errors.len(), "Session closed");
        Error::collect(errors)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            debug!("Session dropped without close");
            if let Err(err) = self.shutdown() {
                warn!(error = %err, "Failed to close session on drop");
            }
        }
    }
}
