//! Table and column descriptors.
//!
//! A table is identified by an explicit [`TableDescriptor`] value: a name
//! plus an ordered list of [`ColumnSpec`]s. Callers that prefer declaring
//! tables as types implement [`Table`] and obtain the descriptor from it.

use core::fmt;

/// A single column definition: name, SQL type and constraint clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    name: String,
    sql_type: String,
    constraints: String,
}

impl ColumnSpec {
    /// Creates a new column definition.
    ///
    /// `constraints` may be empty.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sql_type: impl Into<String>,
        constraints: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            constraints: constraints.into(),
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared SQL type.
    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    /// Returns the constraint clause (possibly empty).
    #[must_use]
    pub fn constraints(&self) -> &str {
        &self.constraints
    }

    /// Returns the column definition used in `CREATE TABLE`.
    ///
    /// Name, type and constraints are joined with single spaces, so a column
    /// without constraints keeps a trailing space.
    #[must_use]
    pub fn column_string(&self) -> String {
        format!("{} {} {}", self.name, self.sql_type, self.constraints)
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for ColumnSpec {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// A named, ordered set of columns identifying one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    name: String,
    columns: Vec<ColumnSpec>,
}

impl TableDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Returns the raw table name, without validation.
    ///
    /// Use [`resolve`] to obtain a name suitable for SQL generation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Trait for tables declared as Rust types.
///
/// # Example
///
/// ```rust
/// use oxide_facade_core::schema::{ColumnSpec, Table};
///
/// struct Users;
///
/// impl Table for Users {
///     const NAME: &'static str = "users";
///
///     fn columns() -> Vec<ColumnSpec> {
///         vec![
///             ColumnSpec::new("id", "integer", "primary key autoincrement"),
///             ColumnSpec::new("name", "varchar(255)", "not null"),
///         ]
///     }
/// }
///
/// let users = Users::descriptor();
/// assert_eq!(users.name(), "users");
/// assert_eq!(users.columns().len(), 2);
/// ```
pub trait Table {
    /// The SQL table name.
    const NAME: &'static str;

    /// Column definitions in declaration order.
    fn columns() -> Vec<ColumnSpec>;

    /// Builds the descriptor for this table.
    #[must_use]
    fn descriptor() -> TableDescriptor {
        TableDescriptor::new(Self::NAME, Self::columns())
    }
}

/// Errors raised while resolving a table descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The descriptor carries no usable table name.
    MissingTableName {
        /// Names of the descriptor's columns, to help locate the definition.
        columns: Vec<String>,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTableName { columns } => write!(
                f,
                "missing table-name accessor: descriptor with columns [{}] has no table name",
                columns.join(", ")
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Resolves the canonical table name of a descriptor.
///
/// # Errors
///
/// Returns [`SchemaError::MissingTableName`] when the name is empty or only
/// whitespace. This is an authoring mistake in the schema, not a runtime
/// condition, and is never retried.
pub fn resolve(table: &TableDescriptor) -> Result<&str, SchemaError> {
    let name = table.name.trim();
    if name.is_empty() {
        return Err(SchemaError::MissingTableName {
            columns: table.columns.iter().map(|c| c.name.clone()).collect(),
        });
    }
    Ok(name)
}
