//! Blocking SQLite driver on top of sqlx.
//!
//! sqlx is asynchronous; the session layer is not. Each connection owns a
//! current-thread tokio runtime and drives every sqlx future to completion
//! with `block_on`. Result rows are materialized before they are handed to
//! the session.
//!
//! Nothing stays prepared on the SQLite side between calls. `prepare` checks
//! the SQL and learns its shape, then evicts it from sqlx's statement cache;
//! every execution runs a one-shot statement that is finalized once it
//! completes. Closing a handle therefore only has to drop its bindings.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use oxide_facade::{
    Connection, Dialect, DriverError, DriverStatement, GeneratedKeys, RowSet, SqlValue, Value,
};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteRow};
use sqlx::{Column as _, ConnectOptions as _, Executor as _, Row as _, Sqlite};
use sqlx::{Connection as _, Statement as _, TypeInfo as _, ValueRef as _};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::config::SqliteConfig;
use crate::dialect::SqliteDialect;

/// Column name of the row returned by [`DriverStatement::generated_keys`].
pub const GENERATED_KEY_COLUMN: &str = "GENERATED_KEY";

struct Shared {
    // Declared before the runtime so it is dropped first.
    connection: RefCell<Option<sqlx::SqliteConnection>>,
    runtime: Runtime,
}

impl Shared {
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Runtime, &mut sqlx::SqliteConnection) -> Result<T, DriverError>,
    ) -> Result<T, DriverError> {
        let mut guard = self.connection.borrow_mut();
        let connection = guard.as_mut().ok_or(DriverError::ConnectionClosed)?;
        f(&self.runtime, connection)
    }
}

/// A SQLite connection usable by [`oxide_facade::Session`].
pub struct SqliteConnection {
    shared: Rc<Shared>,
    dialect: SqliteDialect,
}

impl SqliteConnection {
    /// Opens the database described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the URL is invalid, the runtime cannot start or the database
    /// cannot be opened.
    pub fn open(config: &SqliteConfig) -> Result<Self, DriverError> {
        config.validate().map_err(DriverError::backend)?;
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(DriverError::backend)?
            .create_if_missing(config.create_if_missing)
            .foreign_keys(config.foreign_keys)
            .busy_timeout(config.busy_timeout());

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(DriverError::backend)?;
        let connection = runtime
            .block_on(options.connect())
            .map_err(DriverError::backend)?;
        info!(url = %config.url, "Connected to SQLite");

        Ok(Self {
            shared: Rc::new(Shared {
                connection: RefCell::new(Some(connection)),
                runtime,
            }),
            dialect: SqliteDialect::new(),
        })
    }
}

impl Connection for SqliteConnection {
    fn prepare(
        &mut self,
        sql: &str,
        keys: GeneratedKeys,
    ) -> Result<Box<dyn DriverStatement>, DriverError> {
        let (placeholders, columns, returns_key) =
            self.shared.with_connection(|runtime, connection| {
                let statement = runtime
                    .block_on(connection.prepare(sql))
                    .map_err(DriverError::backend)?;
                let placeholders = statement
                    .parameters()
                    .map_or(0, |params| params.either(|types| types.len(), |n| n));
                let columns = statement
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect::<Vec<_>>();
                runtime
                    .block_on(connection.clear_cached_statements())
                    .map_err(DriverError::backend)?;

                let returns_key = match (keys, insert_target(sql)) {
                    (GeneratedKeys::Return, Some(table)) => {
                        has_rowid(runtime, connection, table)?
                    }
                    _ => false,
                };
                Ok((placeholders, columns, returns_key))
            })?;
        debug!(sql = %sql, placeholders, returns_key, "Prepared SQLite statement");

        Ok(Box::new(SqliteStatement {
            shared: Rc::clone(&self.shared),
            sql: sql.to_string(),
            returns_key,
            placeholders,
            columns,
            bindings: Vec::new(),
            last_key: None,
        }))
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn close(&mut self) -> Result<(), DriverError> {
        let Some(connection) = self.shared.connection.borrow_mut().take() else {
            return Ok(());
        };
        self.shared
            .runtime
            .block_on(connection.close())
            .map_err(DriverError::backend)?;
        info!("SQLite connection closed");
        Ok(())
    }
}

struct SqliteStatement {
    shared: Rc<Shared>,
    sql: String,
    // Set only for inserts into a table that has a rowid.
    returns_key: bool,
    placeholders: usize,
    columns: Vec<String>,
    bindings: Vec<Option<SqlValue>>,
    last_key: Option<i64>,
}

impl SqliteStatement {
    fn bind(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError> {
        let slot = index
            .checked_sub(1)
            .ok_or_else(|| DriverError::backend("parameter indexes start at 1"))?;
        if self.bindings.len() <= slot {
            self.bindings.resize(slot + 1, None);
        }
        self.bindings[slot] = Some(value);
        Ok(())
    }

    fn arguments(&self) -> Result<Vec<SqlValue>, DriverError> {
        let supplied = self.bindings.iter().flatten().count();
        if self.bindings.len() != self.placeholders || supplied != self.placeholders {
            return Err(DriverError::ParameterMismatch {
                expected: self.placeholders,
                supplied,
            });
        }
        Ok(self.bindings.iter().flatten().cloned().collect())
    }
}

/// Returns the table an `INSERT` or `REPLACE` statement writes to.
///
/// Recognizes `INSERT [OR <action>] INTO <table>` and `REPLACE INTO <table>`.
/// A schema prefix and identifier quotes are stripped. Anything else,
/// including statements opening with a `WITH` clause, yields `None`.
fn insert_target(sql: &str) -> Option<&str> {
    let mut words = sql.split_whitespace();
    let verb = words.next()?;
    if verb.eq_ignore_ascii_case("INSERT") {
        let mut next = words.next()?;
        if next.eq_ignore_ascii_case("OR") {
            words.next()?;
            next = words.next()?;
        }
        if !next.eq_ignore_ascii_case("INTO") {
            return None;
        }
    } else if verb.eq_ignore_ascii_case("REPLACE") {
        if !words.next()?.eq_ignore_ascii_case("INTO") {
            return None;
        }
    } else {
        return None;
    }

    let target = words.next()?.split('(').next()?;
    let name = target
        .rsplit('.')
        .next()?
        .trim_matches(|c: char| matches!(c, '"' | '`' | '[' | ']'));
    (!name.is_empty()).then_some(name)
}

/// Tells whether `table` is an ordinary rowid table.
///
/// `last_insert_rowid()` is left untouched by inserts into `WITHOUT ROWID`
/// tables, so those never report a generated key.
fn has_rowid(
    runtime: &Runtime,
    connection: &mut sqlx::SqliteConnection,
    table: &str,
) -> Result<bool, DriverError> {
    let row: Option<(i64,)> = runtime
        .block_on(
            sqlx::query_as::<_, (i64,)>("SELECT wr FROM pragma_table_list WHERE name = ?")
                .bind(table)
                .persistent(false)
                .fetch_optional(&mut *connection),
        )
        .map_err(DriverError::backend)?;
    Ok(row.is_some_and(|(without_rowid,)| without_rowid == 0))
}

fn build_query<'q>(sql: &'q str, values: Vec<SqlValue>) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    values
        .into_iter()
        .fold(sqlx::query(sql).persistent(false), |query, value| match value {
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Long(v) => query.bind(v),
            SqlValue::Float(v) => query.bind(v),
            SqlValue::Double(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
        })
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let kind = raw.type_info().name().to_ascii_uppercase();
    match kind.as_str() {
        "INTEGER" | "BIGINT" | "INT8" | "BOOLEAN" => {
            row.try_get_unchecked::<i64, _>(index).map(Value::Integer)
        }
        "REAL" | "NUMERIC" => row.try_get_unchecked::<f64, _>(index).map(Value::Real),
        "BLOB" => row.try_get_unchecked::<Vec<u8>, _>(index).map(Value::Blob),
        _ => row.try_get_unchecked::<String, _>(index).map(Value::Text),
    }
}

fn decode_row(row: &SqliteRow) -> Result<Vec<Value>, sqlx::Error> {
    (0..row.len()).map(|i| decode_value(row, i)).collect()
}

impl DriverStatement for SqliteStatement {
    fn bind_int(&mut self, index: usize, value: i32) -> Result<(), DriverError> {
        self.bind(index, SqlValue::Int(value))
    }

    fn bind_long(&mut self, index: usize, value: i64) -> Result<(), DriverError> {
        self.bind(index, SqlValue::Long(value))
    }

    fn bind_float(&mut self, index: usize, value: f32) -> Result<(), DriverError> {
        self.bind(index, SqlValue::Float(value))
    }

    fn bind_double(&mut self, index: usize, value: f64) -> Result<(), DriverError> {
        self.bind(index, SqlValue::Double(value))
    }

    fn bind_string(&mut self, index: usize, value: &str) -> Result<(), DriverError> {
        self.bind(index, SqlValue::Text(value.to_string()))
    }

    fn execute_query(&mut self) -> Result<RowSet, DriverError> {
        let arguments = self.arguments()?;
        let query = build_query(&self.sql, arguments);
        let rows = self.shared.with_connection(|runtime, connection| {
            runtime
                .block_on(query.fetch_all(&mut *connection))
                .map_err(DriverError::backend)
        })?;
        let values = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DriverError::backend)?;
        debug!(sql = %self.sql, rows = values.len(), "Query returned");
        Ok(RowSet::new(self.columns.clone(), values))
    }

    fn execute_update(&mut self) -> Result<u64, DriverError> {
        let arguments = self.arguments()?;
        let query = build_query(&self.sql, arguments);
        let done = self.shared.with_connection(|runtime, connection| {
            runtime
                .block_on(query.execute(&mut *connection))
                .map_err(DriverError::backend)
        })?;
        let affected = done.rows_affected();
        self.last_key = (affected > 0 && self.returns_key).then_some(done.last_insert_rowid());
        Ok(affected)
    }

    fn generated_keys(&mut self) -> Result<RowSet, DriverError> {
        let rows = self
            .last_key
            .map(|key| vec![vec![Value::Integer(key)]])
            .unwrap_or_default();
        Ok(RowSet::new(vec![String::from(GENERATED_KEY_COLUMN)], rows))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.bindings.clear();
        self.last_key = None;
        Ok(())
    }
}
