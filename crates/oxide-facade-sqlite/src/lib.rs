//! # oxide-facade-sqlite
//!
//! SQLite driver for `oxide-facade`, built on sqlx.
//!
//! ## Example
//!
//! ```rust
//! use oxide_facade::{ColumnSpec, TableDescriptor, ValueMapping};
//! use oxide_facade_sqlite::{connect, SqliteConfig};
//!
//! let name = ColumnSpec::new("name", "text", "not null");
//! let users = TableDescriptor::new(
//!     "users",
//!     vec![
//!         ColumnSpec::new("id", "integer", "primary key autoincrement"),
//!         name.clone(),
//!     ],
//! );
//!
//! let mut session = connect(&SqliteConfig::in_memory()).unwrap();
//! session.create(&users).unwrap();
//! let id = session
//!     .insert(&users, &ValueMapping::new().with(&name, "alice"))
//!     .unwrap();
//! assert_eq!(id, 1);
//! assert_eq!(session.count(&users).unwrap(), 1);
//! session.close().unwrap();
//! ```
//!
//! ## Differences from other backends
//!
//! - Table existence is checked against `sqlite_master`.
//! - Generated keys come from `last_insert_rowid()` and are only reported
//!   for `INSERT` and `REPLACE` statements that changed a row of a rowid
//!   table. Inserts into `WITHOUT ROWID` tables report no key.
//! - Statements are never cached on the SQLite side; each execution
//!   prepares and finalizes its own statement.
//! - Column types follow SQLite's type affinity: a value is read back with
//!   the storage class it was stored with, not the declared column type.

pub mod config;
pub mod dialect;
pub mod driver;

pub use config::{ConfigError, SqliteConfig, DATABASE_URL_VAR};
pub use dialect::SqliteDialect;
pub use driver::{SqliteConnection, GENERATED_KEY_COLUMN};

use oxide_facade::{Connection, Session};

/// Opens a session on the database described by `config`.
///
/// # Errors
///
/// Returns [`oxide_facade::Error::Connection`] if the database cannot be
/// opened.
pub fn connect(config: &SqliteConfig) -> oxide_facade::Result<Session> {
    Session::connect(|| {
        SqliteConnection::open(config).map(|c| Box::new(c) as Box<dyn Connection>)
    })
}
