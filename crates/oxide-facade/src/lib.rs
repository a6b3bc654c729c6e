//! # oxide-facade
//!
//! A thin session layer over a relational database. Callers describe a
//! table once (name plus column definitions) and then issue structured
//! select, insert, update, delete, create, drop, existence and aggregate
//! requests. The session turns each request into SQL text, prepares it,
//! binds predicate arguments positionally and executes it.
//!
//! Every statement a session opens is registered with it and released in
//! bulk by [`Session::clear`] or when the session closes. Cursors read from
//! a statement stop working once that statement is closed.
//!
//! The database itself sits behind the [`driver`] traits; see the
//! `oxide-facade-sqlite` crate for a SQLite driver.
//!
//! ## Modules
//!
//! - [`session`]: the CRUD facade
//! - [`statement`]: prepared statement handles and positional binding
//! - [`binder`]: dispatch of [`SqlValue`]s onto typed binds
//! - [`registry`]: the per-session statement registry
//! - [`cursor`]: materialized result rows
//! - [`driver`]: the backend seam
//! - [`time`]: timestamp formatting helpers

pub mod binder;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod registry;
pub mod session;
pub mod statement;
pub mod time;

pub use oxide_facade_core::builder::{AggregateFunction, SqlValue, UnsupportedType, ValueMapping};
pub use oxide_facade_core::dialect::{Dialect, GenericDialect};
pub use oxide_facade_core::schema::{ColumnSpec, SchemaError, Table, TableDescriptor};

pub use cursor::{ColumnIndex, Cursor, Row, RowSet, Value};
pub use driver::{Connection, DriverStatement, GeneratedKeys};
pub use error::{BoxError, DriverError, Error, Result};
pub use registry::StatementRegistry;
pub use session::{Session, NO_GENERATED_KEY};
pub use statement::StatementHandle;
pub use time::{format_timestamp, format_timestamp_in, DATETIME_FORMAT};
