//! # oxide-facade-core
//!
//! Pure building blocks for the oxide-facade session layer:
//!
//! - [`schema`]: table descriptors, column definitions and table-name
//!   resolution
//! - [`builder`]: side-effect-free SQL text generation for SELECT, INSERT,
//!   UPDATE, DELETE, CREATE/DROP TABLE and aggregate queries
//! - [`dialect`]: the backend-specific statements the builders cannot
//!   express portably
//!
//! Nothing here performs I/O.
//!
//! ## Example
//!
//! ```rust
//! use oxide_facade_core::builder::{insert_sql, update_sql, ValueMapping};
//! use oxide_facade_core::schema::ColumnSpec;
//!
//! let name = ColumnSpec::new("name", "varchar(255)", "not null");
//! let score = ColumnSpec::new("score", "int", "not null default 0");
//!
//! let values = ValueMapping::new().with(&name, "alice").with(&score, 80_i32);
//!
//! assert_eq!(
//!     insert_sql("users", &values),
//!     "INSERT INTO users (name,score) VALUES ('alice',80)"
//! );
//! assert_eq!(
//!     update_sql("users", &values, Some("id = ?")),
//!     "UPDATE users SET name = 'alice',score = 80 WHERE id = ?"
//! );
//! ```
//!
//! ## Literal values
//!
//! INSERT and UPDATE embed their values as literals. Text is wrapped in
//! single quotes but NOT escaped, so only trusted values belong there.
//! Untrusted input should go through predicate placeholders (`?`), which the
//! session binds positionally.

pub mod builder;
pub mod dialect;
pub mod schema;

pub use builder::{AggregateFunction, SqlValue, ValueMapping};
pub use dialect::{Dialect, GenericDialect};
pub use schema::{resolve, ColumnSpec, SchemaError, Table, TableDescriptor};
