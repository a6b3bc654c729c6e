//! DELETE statement text.

use super::push_where;

/// Builds `DELETE FROM <table> [WHERE <predicate>]`.
///
/// **Warning**: without a predicate this deletes every row.
#[must_use]
pub fn delete_sql(table: &str, predicate: Option<&str>) -> String {
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(table);
    push_where(&mut sql, predicate);
    sql
}
