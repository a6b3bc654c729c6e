//! SELECT and aggregate query text.

use core::fmt;

use super::{push_joined, push_where};

/// Builds `SELECT <col1,col2,...> FROM <table> [WHERE <predicate>]`.
///
/// `columns` may be the single wildcard `"*"`.
#[must_use]
pub fn select_sql<C: AsRef<str>>(table: &str, columns: &[C], predicate: Option<&str>) -> String {
    let mut sql = String::from("SELECT ");
    push_joined(&mut sql, columns, ",");
    sql.push_str(" FROM ");
    sql.push_str(table);
    push_where(&mut sql, predicate);
    sql
}

/// Builds `SELECT <function>(<column>) FROM <table> [WHERE <predicate>]`.
///
/// The function name is passed through unchecked.
#[must_use]
pub fn aggregate_sql(function: &str, table: &str, column: &str, predicate: Option<&str>) -> String {
    let mut sql = format!("SELECT {function}({column}) FROM {table}");
    push_where(&mut sql, predicate);
    sql
}

/// The aggregate functions exposed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// `sum`
    Sum,
    /// `max`
    Max,
    /// `min`
    Min,
    /// `count`
    Count,
}

impl AggregateFunction {
    /// Returns the SQL function name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
