#![allow(dead_code)]

use oxide_facade_core::schema::{ColumnSpec, Table, TableDescriptor};

pub struct TestTable;

impl TestTable {
    pub fn id() -> ColumnSpec {
        ColumnSpec::new("id", "int", "not null primary key auto_increment")
    }

    pub fn name() -> ColumnSpec {
        ColumnSpec::new("name", "varchar(255)", "not null unique key")
    }

    pub fn password() -> ColumnSpec {
        ColumnSpec::new("password", "varchar(32)", "not null")
    }

    pub fn score() -> ColumnSpec {
        ColumnSpec::new("score", "int", "not null default 0")
    }

    pub fn sex() -> ColumnSpec {
        ColumnSpec::new("sex", "enum('male', 'female')", "default 'male'")
    }

    pub fn saved() -> ColumnSpec {
        ColumnSpec::new("saved", "datetime", "")
    }
}

impl Table for TestTable {
    const NAME: &'static str = "test_table";

    fn columns() -> Vec<ColumnSpec> {
        vec![
            Self::id(),
            Self::name(),
            Self::password(),
            Self::score(),
            Self::sex(),
            Self::saved(),
        ]
    }
}

/// Same columns, but no table name.
pub fn unnamed_table() -> TableDescriptor {
    TableDescriptor::new("", TestTable::columns())
}
