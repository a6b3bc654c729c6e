//! SQL dialect support.
//!
//! The builders emit portable text; the few statements whose shape depends
//! on the backend (such as checking whether a table exists) come from a
//! [`Dialect`].

mod generic;

pub use generic::GenericDialect;

/// Trait for dialect-specific SQL.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the positional parameter placeholder.
    fn parameter_placeholder(&self) -> &'static str {
        "?"
    }

    /// Returns a query yielding at least one row iff the table named by its
    /// single positional parameter exists.
    fn table_exists_sql(&self) -> &'static str;
}
