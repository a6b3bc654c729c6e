//! Session behavior against a recording mock driver.

mod common;

use common::{mock_session, Behavior, Users};
use oxide_facade::binder::{bind_all, bind_any};
use oxide_facade::{
    DriverError, Error, GeneratedKeys, SchemaError, Session, SqlValue, Table, TableDescriptor,
    Value, ValueMapping, NO_GENERATED_KEY,
};

#[test]
fn test_select_binds_arguments_in_order() {
    let (mut session, journal) = mock_session(Behavior::default());
    let table = Users::descriptor();

    session
        .select(
            &table,
            &["id", "name"],
            Some("name = ? and score > ?"),
            &["alice".into(), 5_i32.into()],
        )
        .unwrap();

    let journal = journal.borrow();
    assert_eq!(
        journal.prepared[0].0,
        "SELECT id,name FROM users WHERE name = ? and score > ?"
    );
    assert_eq!(
        journal.binds,
        vec![
            (0, 1, SqlValue::Text(String::from("alice"))),
            (0, 2, SqlValue::Int(5)),
        ]
    );
}

#[test]
fn test_select_by_column_uses_equality_predicate() {
    let (mut session, journal) = mock_session(Behavior::default());

    session
        .select_by_column(&Users::descriptor(), &Users::id(), 7_i64)
        .unwrap();

    let journal = journal.borrow();
    assert_eq!(journal.prepared[0].0, "SELECT * FROM users WHERE id=?");
    assert_eq!(journal.binds, vec![(0, 1, SqlValue::Long(7))]);
}

#[test]
fn test_missing_argument_is_reported_by_driver() {
    let (mut session, _journal) = mock_session(Behavior::default());

    let result = session.select_all_columns(&Users::descriptor(), Some("id = ?"), &[]);

    assert!(matches!(
        result,
        Err(Error::Driver(DriverError::ParameterMismatch {
            expected: 1,
            supplied: 0
        }))
    ));
    // The failed statement stays registered until the session is cleared.
    assert_eq!(session.open_statements(), 1);
}

#[test]
fn test_unnamed_table_is_configuration_error() {
    let (mut session, journal) = mock_session(Behavior::default());
    let table = TableDescriptor::new("  ", Users::columns());

    let result = session.select_all(&table);

    assert!(matches!(
        result,
        Err(Error::Configuration(SchemaError::MissingTableName { .. }))
    ));
    assert!(journal.borrow().prepared.is_empty());
    assert_eq!(session.open_statements(), 0);
}

#[test]
fn test_rejected_sql_is_statement_creation_error() {
    let (mut session, _journal) = mock_session(Behavior {
        reject: Some(String::from("bogus")),
        ..Behavior::default()
    });

    let result = session.execute("SELECT bogus FROM users");

    match result {
        Err(Error::StatementCreation { sql, .. }) => assert_eq!(sql, "SELECT bogus FROM users"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(session.open_statements(), 0);
}

#[test]
fn test_insert_returns_generated_key() {
    let (mut session, journal) = mock_session(Behavior {
        generated_key: Some(42),
        ..Behavior::default()
    });
    let values = ValueMapping::new().with(&Users::name(), "alice");

    let key = session.insert(&Users::descriptor(), &values).unwrap();

    assert_eq!(key, 42);
    let journal = journal.borrow();
    assert_eq!(
        journal.prepared[0],
        (
            String::from("INSERT INTO users (name) VALUES ('alice')"),
            GeneratedKeys::Return
        )
    );
    assert_eq!(journal.key_lookups, 1);
}

#[test]
fn test_insert_without_affected_rows_skips_key_lookup() {
    let (mut session, journal) = mock_session(Behavior {
        update_count: 0,
        generated_key: Some(42),
        ..Behavior::default()
    });
    let values = ValueMapping::new().with(&Users::name(), "alice");

    let key = session.insert(&Users::descriptor(), &values).unwrap();

    assert_eq!(key, NO_GENERATED_KEY);
    assert_eq!(journal.borrow().key_lookups, 0);
}

#[test]
fn test_insert_without_generated_key() {
    let (mut session, _journal) = mock_session(Behavior::default());
    let values = ValueMapping::new().with(&Users::name(), "alice");

    assert_eq!(
        session.insert(&Users::descriptor(), &values).unwrap(),
        NO_GENERATED_KEY
    );
}

#[test]
fn test_update_and_delete_return_affected_rows() {
    let (mut session, journal) = mock_session(Behavior {
        update_count: 3,
        ..Behavior::default()
    });
    let table = Users::descriptor();
    let values = ValueMapping::new().with(&Users::score(), 10_i32);

    assert_eq!(
        session
            .update_by_column(&table, &values, &Users::name(), "bob")
            .unwrap(),
        3
    );
    assert_eq!(session.delete_by_column(&table, &Users::id(), 1_i32).unwrap(), 3);
    assert_eq!(session.empty(&table).unwrap(), 3);

    let prepared: Vec<String> = journal
        .borrow()
        .prepared
        .iter()
        .map(|(sql, _)| sql.clone())
        .collect();
    assert_eq!(
        prepared,
        vec![
            "UPDATE users SET score = 10 WHERE name=?",
            "DELETE FROM users WHERE id=?",
            "DELETE FROM users",
        ]
    );
}

#[test]
fn test_create_and_drop() {
    let (mut session, journal) = mock_session(Behavior {
        update_count: 0,
        ..Behavior::default()
    });
    let table = Users::descriptor();

    session.create(&table).unwrap();
    session.drop(&table).unwrap();

    let journal = journal.borrow();
    assert_eq!(
        journal.prepared[0].0,
        "CREATE TABLE users (id integer primary key,name text not null,score integer not null default 0)"
    );
    assert_eq!(journal.prepared[1].0, "DROP TABLE users");
}

#[test]
fn test_table_exists_uses_dialect_query() {
    let (mut session, journal) =
        mock_session(Behavior::single_value(Value::Text(String::from("users"))));

    assert!(session.table_exists(&Users::descriptor()).unwrap());

    let journal = journal.borrow();
    assert_eq!(
        journal.prepared[0].0,
        "SELECT table_name FROM information_schema.tables WHERE table_name = ?"
    );
    assert_eq!(
        journal.binds,
        vec![(0, 1, SqlValue::Text(String::from("users")))]
    );
}

#[test]
fn test_record_exists() {
    let (mut session, _journal) = mock_session(Behavior::default());
    assert!(!session
        .record_exists_by_column(&Users::descriptor(), &Users::name(), "nobody")
        .unwrap());

    let (mut session, _journal) = mock_session(Behavior::single_value(Value::Integer(1)));
    assert!(session
        .record_exists(&Users::descriptor(), Some("score > ?"), &[SqlValue::Int(3)])
        .unwrap());
}

#[test]
fn test_aggregates() {
    let (mut session, journal) = mock_session(Behavior::single_value(Value::Integer(12)));
    let table = Users::descriptor();

    assert_eq!(session.sum(&table, &Users::score(), None, &[]).unwrap(), 12);
    assert_eq!(
        session
            .max(&table, &Users::score(), Some("name = ?"), &["a".into()])
            .unwrap(),
        12
    );
    assert_eq!(session.min(&table, &Users::score(), None, &[]).unwrap(), 12);
    assert_eq!(session.count(&table).unwrap(), 12);
    assert_eq!(
        session
            .count_column(&table, &Users::name(), None, &[])
            .unwrap(),
        12
    );

    let prepared: Vec<String> = journal
        .borrow()
        .prepared
        .iter()
        .map(|(sql, _)| sql.clone())
        .collect();
    assert_eq!(
        prepared,
        vec![
            "SELECT sum(score) FROM users",
            "SELECT max(score) FROM users WHERE name = ?",
            "SELECT min(score) FROM users",
            "SELECT count(*) FROM users",
            "SELECT count(name) FROM users",
        ]
    );
}

#[test]
fn test_null_aggregate_reads_as_zero() {
    let (mut session, _journal) = mock_session(Behavior::single_value(Value::Null));
    assert_eq!(
        session
            .sum(&Users::descriptor(), &Users::score(), None, &[])
            .unwrap(),
        0
    );
}

#[test]
fn test_aggregate_without_row_is_empty_result() {
    let (mut session, _journal) = mock_session(Behavior::default());

    let result = session.count(&Users::descriptor());

    assert!(matches!(result, Err(Error::EmptyResult { function }) if function == "count"));
}

#[test]
fn test_explicit_handle_binds_positionally() {
    let (mut session, journal) = mock_session(Behavior::default());

    let handle = session
        .execute("SELECT * FROM users WHERE id = ? AND name = ? AND score = ?")
        .unwrap();
    handle
        .bind_long(1)
        .unwrap()
        .bind_string("x")
        .unwrap()
        .bind_double(2.5)
        .unwrap();
    assert_eq!(handle.position(), 3);
    handle.execute_query().unwrap();

    let journal = journal.borrow();
    assert_eq!(journal.prepared[0].1, GeneratedKeys::Return);
    let positions: Vec<usize> = journal.binds.iter().map(|(_, index, _)| *index).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn test_bind_all_dispatches_every_kind() {
    let (mut session, journal) = mock_session(Behavior::default());

    let handle = session
        .execute("INSERT INTO users (a, b, c, d, e) VALUES (?, ?, ?, ?, ?)")
        .unwrap();
    bind_all(
        handle,
        &[
            SqlValue::Int(7),
            SqlValue::Long(8_000_000_000),
            SqlValue::Float(1.5),
            SqlValue::Double(2.25),
            SqlValue::from("text"),
        ],
    )
    .unwrap();
    assert_eq!(handle.position(), 5);

    assert_eq!(
        journal.borrow().binds,
        vec![
            (0, 1, SqlValue::Int(7)),
            (0, 2, SqlValue::Long(8_000_000_000)),
            (0, 3, SqlValue::Float(1.5)),
            (0, 4, SqlValue::Double(2.25)),
            (0, 5, SqlValue::from("text")),
        ]
    );
}

#[test]
fn test_close_is_idempotent_and_blocks_further_use() {
    let (mut session, journal) = mock_session(Behavior::default());

    let handle = session.execute("SELECT * FROM users WHERE id = ?").unwrap();
    handle.close().unwrap();
    handle.close().unwrap();

    assert!(handle.is_closed());
    assert!(matches!(handle.bind_int(1), Err(Error::ClosedHandle)));
    assert!(matches!(handle.execute_update(), Err(Error::ClosedHandle)));
    assert_eq!(handle.position(), 0);

    session.clear().unwrap();
    assert_eq!(journal.borrow().statement_closes(), vec![0]);
}

#[test]
fn test_unsupported_argument_type() {
    let (mut session, journal) = mock_session(Behavior::default());

    let handle = session.execute("SELECT * FROM users WHERE id = ?").unwrap();
    let result = bind_any(handle, &true);

    match result {
        Err(Error::UnsupportedArgumentType(err)) => assert_eq!(err.type_name, "bool"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(handle.position(), 0);
    bind_any(handle, &9_i64).unwrap();
    assert_eq!(journal.borrow().binds, vec![(0, 1, SqlValue::Long(9))]);
}

#[test]
fn test_cursor_invalid_after_clear() {
    let (mut session, _journal) = mock_session(Behavior::single_value(Value::Integer(1)));

    let mut cursor = session.select_all(&Users::descriptor()).unwrap();
    session.clear().unwrap();

    assert!(matches!(cursor.next_row(), Err(Error::ClosedHandle)));
}

#[test]
fn test_clear_releases_in_order_past_failures() {
    let (mut session, journal) = mock_session(Behavior {
        failing_close: vec![String::from("DELETE")],
        ..Behavior::default()
    });
    let table = Users::descriptor();

    session.select_all(&table).unwrap();
    session.delete(&table, None, &[]).unwrap();
    assert!(session.count_column(&table, &Users::id(), None, &[]).is_err());
    assert_eq!(session.open_statements(), 3);

    let result = session.clear();

    assert!(matches!(result, Err(Error::Driver(DriverError::Backend(_)))));
    assert_eq!(journal.borrow().statement_closes(), vec![0, 1, 2]);
    assert_eq!(session.open_statements(), 0);

    session.clear().unwrap();
    assert_eq!(journal.borrow().statement_closes(), vec![0, 1, 2]);
}

#[test]
fn test_clear_collects_every_failure() {
    let (mut session, _journal) = mock_session(Behavior {
        failing_close: vec![String::from("users")],
        ..Behavior::default()
    });
    let table = Users::descriptor();
    session.select_all(&table).unwrap();
    session.empty(&table).unwrap();

    let result = session.clear();

    assert!(matches!(result, Err(Error::Multiple(errors)) if errors.len() == 2));
}

#[test]
fn test_session_usable_after_clear() {
    let (mut session, _journal) = mock_session(Behavior::default());
    session.select_all(&Users::descriptor()).unwrap();
    session.clear().unwrap();

    session.select_all(&Users::descriptor()).unwrap();
    assert_eq!(session.open_statements(), 1);
}

#[test]
fn test_close_releases_connection_then_statements() {
    let (mut session, journal) = mock_session(Behavior {
        failing_connection_close: true,
        ..Behavior::default()
    });
    session.select_all(&Users::descriptor()).unwrap();
    session.empty(&Users::descriptor()).unwrap();

    let result = session.close();

    assert!(matches!(result, Err(Error::Driver(DriverError::Backend(_)))));
    assert_eq!(
        journal.borrow().closes,
        vec!["connection", "stmt 0", "stmt 1"]
    );
}

#[test]
fn test_drop_releases_everything() {
    let (mut session, journal) = mock_session(Behavior::default());
    session.select_all(&Users::descriptor()).unwrap();

    drop(session);

    assert_eq!(journal.borrow().closes, vec!["connection", "stmt 0"]);
}

#[test]
fn test_connect_failure() {
    let result = Session::connect(|| Err(DriverError::backend("unreachable host")));

    match result {
        Err(err @ Error::Connection(_)) => {
            assert_eq!(
                err.to_string(),
                "failed to connect to database: unreachable host"
            );
        }
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("connection should fail"),
    }
}
