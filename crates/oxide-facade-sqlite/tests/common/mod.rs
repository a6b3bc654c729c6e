#![allow(dead_code)]

use oxide_facade::{ColumnSpec, Session, Table, ValueMapping};
use oxide_facade_sqlite::{connect, SqliteConfig};

pub struct TestTable;

impl TestTable {
    pub fn id() -> ColumnSpec {
        ColumnSpec::new("id", "integer", "primary key autoincrement")
    }

    pub fn name() -> ColumnSpec {
        ColumnSpec::new("name", "varchar(255)", "not null unique")
    }

    pub fn password() -> ColumnSpec {
        ColumnSpec::new("password", "varchar(32)", "not null")
    }

    pub fn score() -> ColumnSpec {
        ColumnSpec::new("score", "integer", "not null default 0")
    }

    pub fn sex() -> ColumnSpec {
        ColumnSpec::new("sex", "text", "default 'male'")
    }

    pub fn saved() -> ColumnSpec {
        ColumnSpec::new("saved", "datetime", "")
    }

    pub fn row(name: &str, score: i32) -> ValueMapping {
        ValueMapping::new()
            .with(&Self::name(), name)
            .with(&Self::password(), "password")
            .with(&Self::score(), score)
            .with(&Self::sex(), "male")
            .with(&Self::saved(), "2017-02-21 09:14:42")
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

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A session on a fresh in-memory database with the test table created.
pub fn session() -> Session {
    init_tracing();
    let mut session = connect(&SqliteConfig::in_memory()).unwrap();
    session.create(&TestTable::descriptor()).unwrap();
    session
}

/// Like [`session`], with rows `name1`..`nameN` scored 10, 20, ...
pub fn seeded_session(rows: i32) -> Session {
    let mut session = session();
    let table = TestTable::descriptor();
    for i in 1..=rows {
        session
            .insert(&table, &TestTable::row(&format!("name{i}"), i * 10))
            .unwrap();
    }
    session
}
