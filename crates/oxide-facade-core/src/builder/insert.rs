//! INSERT statement text.

use super::mapping::ValueMapping;
use super::push_joined;

/// Builds `INSERT INTO <table> (<col,...>) VALUES (<literal,...>)`.
///
/// Columns and values are emitted positionally aligned, in mapping order.
/// An empty mapping yields `INSERT INTO <table> () VALUES ()`; callers are
/// expected not to pass one.
#[must_use]
pub fn insert_sql(table: &str, values: &ValueMapping) -> String {
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(table);
    sql.push_str(" (");
    push_joined(&mut sql, values.columns(), ",");
    sql.push_str(") VALUES (");
    push_joined(&mut sql, values.values().map(|v| v.to_sql_literal()), ",");
    sql.push(')');
    sql
}
