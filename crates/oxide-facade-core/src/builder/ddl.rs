//! CREATE TABLE / DROP TABLE text.

use crate::schema::ColumnSpec;

use super::push_joined;

/// Builds `CREATE TABLE <table> (<column definition>,...)`.
///
/// Each definition is [`ColumnSpec::column_string`], in descriptor order.
#[must_use]
pub fn create_table_sql(table: &str, columns: &[ColumnSpec]) -> String {
    let mut sql = String::from("CREATE TABLE ");
    sql.push_str(table);
    sql.push_str(" (");
    push_joined(&mut sql, columns.iter().map(ColumnSpec::column_string), ",");
    sql.push(')');
    sql
}

/// Builds `DROP TABLE <table>`.
#[must_use]
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE {table}")
}
