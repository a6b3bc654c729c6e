//! SQL text builders.
//!
//! Every function here is pure: it takes a table name plus columns,
//! values or a predicate and returns SQL text. Shared conventions:
//!
//! - A predicate that is `None` or empty adds no `WHERE` fragment; anything
//!   else is appended verbatim as ` WHERE <predicate>`. Predicates are never
//!   parsed, validated or escaped.
//! - Values in INSERT and UPDATE are embedded as literals via
//!   [`SqlValue::to_sql_literal`]. Text is single-quoted without escaping.
//! - List separators only appear between items.
//!
//! # Example
//!
//! ```rust
//! use oxide_facade_core::builder::{select_sql, delete_sql};
//!
//! let sql = select_sql("users", &["id", "name"], Some("id = ?"));
//! assert_eq!(sql, "SELECT id,name FROM users WHERE id = ?");
//!
//! assert_eq!(delete_sql("users", None), "DELETE FROM users");
//! ```

mod ddl;
mod delete;
mod insert;
pub mod mapping;
mod select;
mod update;
pub mod value;

pub use ddl::{create_table_sql, drop_table_sql};
pub use delete::delete_sql;
pub use insert::insert_sql;
pub use mapping::ValueMapping;
pub use select::{aggregate_sql, select_sql, AggregateFunction};
pub use update::update_sql;
pub use value::{SqlValue, UnsupportedType};

/// Returns the predicate `<column>=?` used by the single-column operations.
#[must_use]
pub fn column_predicate(column: &str) -> String {
    format!("{column}=?")
}

/// Returns ` WHERE <predicate>`, or an empty string when the predicate is
/// absent or empty.
#[must_use]
pub fn where_clause(predicate: Option<&str>) -> String {
    let mut clause = String::new();
    push_where(&mut clause, predicate);
    clause
}

fn push_where(sql: &mut String, predicate: Option<&str>) {
    if let Some(predicate) = predicate.filter(|p| !p.is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(predicate);
    }
}

/// Appends `items` separated by `sep`.
fn push_joined<I, S>(sql: &mut String, items: I, sep: &str)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i != 0 {
            sql.push_str(sep);
        }
        sql.push_str(item.as_ref());
    }
}
