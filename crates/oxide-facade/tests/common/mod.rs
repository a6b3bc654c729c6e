#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use oxide_facade::{
    ColumnSpec, Connection, Dialect, DriverError, DriverStatement, GeneratedKeys, GenericDialect,
    RowSet, Session, SqlValue, Table, Value,
};

/// Table used by the session tests.
pub struct Users;

impl Users {
    pub fn id() -> ColumnSpec {
        ColumnSpec::new("id", "integer", "primary key")
    }

    pub fn name() -> ColumnSpec {
        ColumnSpec::new("name", "text", "not null")
    }

    pub fn score() -> ColumnSpec {
        ColumnSpec::new("score", "integer", "not null default 0")
    }
}

impl Table for Users {
    const NAME: &'static str = "users";

    fn columns() -> Vec<ColumnSpec> {
        vec![Self::id(), Self::name(), Self::score()]
    }
}

/// How the mock backend answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub update_count: u64,
    pub generated_key: Option<i64>,
    pub rows: RowSet,
    /// Prepare fails for SQL containing this text.
    pub reject: Option<String>,
    /// Statement close fails for SQL containing any of these.
    pub failing_close: Vec<String>,
    pub failing_connection_close: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            update_count: 1,
            generated_key: None,
            rows: RowSet::empty(),
            reject: None,
            failing_close: Vec::new(),
            failing_connection_close: false,
        }
    }
}

impl Behavior {
    pub fn single_value(value: Value) -> Self {
        Self {
            rows: RowSet::new(vec![String::from("value")], vec![vec![value]]),
            ..Self::default()
        }
    }
}

/// Everything the mock backend saw, in order.
#[derive(Debug, Default)]
pub struct Journal {
    pub prepared: Vec<(String, GeneratedKeys)>,
    /// `(statement, index, value)`
    pub binds: Vec<(usize, usize, SqlValue)>,
    /// `stmt <n>` for statements, `connection` for the connection.
    pub closes: Vec<String>,
    pub key_lookups: usize,
}

impl Journal {
    pub fn statement_closes(&self) -> Vec<usize> {
        self.closes
            .iter()
            .filter_map(|c| c.strip_prefix("stmt ").and_then(|n| n.parse().ok()))
            .collect()
    }
}

pub struct MockConnection {
    behavior: Rc<Behavior>,
    journal: Rc<RefCell<Journal>>,
    dialect: GenericDialect,
    next_id: usize,
}

impl Connection for MockConnection {
    fn prepare(
        &mut self,
        sql: &str,
        keys: GeneratedKeys,
    ) -> Result<Box<dyn DriverStatement>, DriverError> {
        if let Some(reject) = &self.behavior.reject {
            if sql.contains(reject.as_str()) {
                return Err(DriverError::backend(format!("no such column: {reject}")));
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.journal
            .borrow_mut()
            .prepared
            .push((sql.to_string(), keys));
        Ok(Box::new(MockStatement {
            id,
            sql: sql.to_string(),
            placeholders: sql.matches('?').count(),
            bound: 0,
            executed: false,
            behavior: Rc::clone(&self.behavior),
            journal: Rc::clone(&self.journal),
        }))
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.journal
            .borrow_mut()
            .closes
            .push(String::from("connection"));
        if self.behavior.failing_connection_close {
            return Err(DriverError::backend("connection reset"));
        }
        Ok(())
    }
}

struct MockStatement {
    id: usize,
    sql: String,
    placeholders: usize,
    bound: usize,
    executed: bool,
    behavior: Rc<Behavior>,
    journal: Rc<RefCell<Journal>>,
}

impl MockStatement {
    fn record(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError> {
        self.bound = self.bound.max(index);
        self.journal.borrow_mut().binds.push((self.id, index, value));
        Ok(())
    }

    fn check_arity(&self) -> Result<(), DriverError> {
        if self.bound == self.placeholders {
            Ok(())
        } else {
            Err(DriverError::ParameterMismatch {
                expected: self.placeholders,
                supplied: self.bound,
            })
        }
    }
}

impl DriverStatement for MockStatement {
    fn bind_int(&mut self, index: usize, value: i32) -> Result<(), DriverError> {
        self.record(index, SqlValue::Int(value))
    }

    fn bind_long(&mut self, index: usize, value: i64) -> Result<(), DriverError> {
        self.record(index, SqlValue::Long(value))
    }

    fn bind_float(&mut self, index: usize, value: f32) -> Result<(), DriverError> {
        self.record(index, SqlValue::Float(value))
    }

    fn bind_double(&mut self, index: usize, value: f64) -> Result<(), DriverError> {
        self.record(index, SqlValue::Double(value))
    }

    fn bind_string(&mut self, index: usize, value: &str) -> Result<(), DriverError> {
        self.record(index, SqlValue::Text(value.to_string()))
    }

    fn execute_query(&mut self) -> Result<RowSet, DriverError> {
        self.check_arity()?;
        Ok(self.behavior.rows.clone())
    }

    fn execute_update(&mut self) -> Result<u64, DriverError> {
        self.check_arity()?;
        self.executed = true;
        Ok(self.behavior.update_count)
    }

    fn generated_keys(&mut self) -> Result<RowSet, DriverError> {
        self.journal.borrow_mut().key_lookups += 1;
        let rows = match self.behavior.generated_key {
            Some(key) if self.executed => vec![vec![Value::Integer(key)]],
            _ => Vec::new(),
        };
        Ok(RowSet::new(vec![String::from("GENERATED_KEY")], rows))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.journal
            .borrow_mut()
            .closes
            .push(format!("stmt {}", self.id));
        if self
            .behavior
            .failing_close
            .iter()
            .any(|s| self.sql.contains(s.as_str()))
        {
            return Err(DriverError::backend(format!("cannot finalize `{}`", self.sql)));
        }
        Ok(())
    }
}

/// Opens a session over a mock connection and returns its journal.
pub fn mock_session(behavior: Behavior) -> (Session, Rc<RefCell<Journal>>) {
    let journal = Rc::new(RefCell::new(Journal::default()));
    let connection = MockConnection {
        behavior: Rc::new(behavior),
        journal: Rc::clone(&journal),
        dialect: GenericDialect::new(),
        next_id: 0,
    };
    (Session::new(Box::new(connection)), journal)
}
