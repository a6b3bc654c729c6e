//! UPDATE statement text.

use super::mapping::ValueMapping;
use super::{push_joined, push_where};

/// Builds `UPDATE <table> SET <col> = <literal>,... [WHERE <predicate>]`.
///
/// Assignments follow mapping order. An empty mapping yields the degenerate
/// `UPDATE <table> SET `.
#[must_use]
pub fn update_sql(table: &str, values: &ValueMapping, predicate: Option<&str>) -> String {
    let mut sql = String::from("UPDATE ");
    sql.push_str(table);
    sql.push_str(" SET ");
    push_joined(
        &mut sql,
        values
            .iter()
            .map(|(column, value)| format!("{column} = {}", value.to_sql_literal())),
        ",",
    );
    push_where(&mut sql, predicate);
    sql
}
