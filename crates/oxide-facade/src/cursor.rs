//! Result cursors.
//!
//! Drivers hand back fully materialized [`RowSet`]s; a statement handle wraps
//! them in a [`Cursor`] that stays readable only while the handle is open.

use std::rc::{Rc, Weak};

use oxide_facade_core::schema::ColumnSpec;

use crate::error::{Error, Result};

/// A single column value read from the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns the name of the value's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

/// Rows produced by a driver, before they are attached to a handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column names, in result order.
    pub columns: Vec<String>,
    /// Row values, each aligned with `columns`. Rows must not be wider than
    /// `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Creates a row set.
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Creates a row set without columns or rows.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Something that can address a column of a [`Row`].
///
/// Implemented for zero-based positions, column names and column specs.
pub trait ColumnIndex {
    /// Returns the position of the column within `columns`.
    fn position(&self, columns: &[String]) -> Option<usize>;

    /// Describes the index for error messages.
    fn describe(&self) -> String;
}

impl ColumnIndex for usize {
    fn position(&self, columns: &[String]) -> Option<usize> {
        (*self < columns.len()).then_some(*self)
    }

    fn describe(&self) -> String {
        format!("#{self}")
    }
}

impl ColumnIndex for &str {
    fn position(&self, columns: &[String]) -> Option<usize> {
        columns.iter().position(|c| c.eq_ignore_ascii_case(self))
    }

    fn describe(&self) -> String {
        (*self).to_string()
    }
}

impl ColumnIndex for &String {
    fn position(&self, columns: &[String]) -> Option<usize> {
        self.as_str().position(columns)
    }

    fn describe(&self) -> String {
        (*self).clone()
    }
}

impl ColumnIndex for &ColumnSpec {
    fn position(&self, columns: &[String]) -> Option<usize> {
        self.name().position(columns)
    }

    fn describe(&self) -> String {
        self.name().to_string()
    }
}

/// One result row.
///
/// Numeric accessors read NULL as zero, the usual driver convention; use
/// [`Row::is_null`] to tell the two apart. [`Row::get_string`] fails on NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Rc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Returns the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the raw value of a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] for an unknown column.
    pub fn get<I: ColumnIndex>(&self, index: I) -> Result<&Value> {
        index
            .position(&self.columns)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| Error::ColumnNotFound(index.describe()))
    }

    /// Returns true if the column holds NULL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] for an unknown column.
    pub fn is_null<I: ColumnIndex>(&self, index: I) -> Result<bool> {
        Ok(matches!(self.get(index)?, Value::Null))
    }

    /// Reads a column as a 64-bit integer.
    ///
    /// # Errors
    ///
    /// Fails for unknown columns, blobs and text that is not an integer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_long<I: ColumnIndex>(&self, index: I) -> Result<i64> {
        let column = index.describe();
        match self.get(index)? {
            Value::Null => Ok(0),
            Value::Integer(n) => Ok(*n),
            Value::Real(x) => Ok(*x as i64),
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| mismatch(column, "long", "text")),
            Value::Blob(_) => Err(mismatch(column, "long", "blob")),
        }
    }

    /// Reads a column as a 32-bit integer.
    ///
    /// # Errors
    ///
    /// Fails like [`Row::get_long`], and when the value does not fit in `i32`.
    pub fn get_int<I: ColumnIndex>(&self, index: I) -> Result<i32> {
        let column = index.describe();
        let value = self.get_long(index)?;
        i32::try_from(value).map_err(|_| mismatch(column, "int", "integer"))
    }

    /// Reads a column as a double.
    ///
    /// # Errors
    ///
    /// Fails for unknown columns, blobs and text that is not a number.
    #[allow(clippy::cast_precision_loss)]
    pub fn get_double<I: ColumnIndex>(&self, index: I) -> Result<f64> {
        let column = index.describe();
        match self.get(index)? {
            Value::Null => Ok(0.0),
            Value::Integer(n) => Ok(*n as f64),
            Value::Real(x) => Ok(*x),
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| mismatch(column, "double", "text")),
            Value::Blob(_) => Err(mismatch(column, "double", "blob")),
        }
    }

    /// Reads a column as a float.
    ///
    /// # Errors
    ///
    /// Fails like [`Row::get_double`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_float<I: ColumnIndex>(&self, index: I) -> Result<f32> {
        self.get_double(index).map(|x| x as f32)
    }

    /// Reads a column as text. Numbers are rendered in decimal.
    ///
    /// # Errors
    ///
    /// Fails for unknown columns, NULL and blobs.
    pub fn get_string<I: ColumnIndex>(&self, index: I) -> Result<String> {
        let column = index.describe();
        match self.get(index)? {
            Value::Text(s) => Ok(s.clone()),
            Value::Integer(n) => Ok(n.to_string()),
            Value::Real(x) => Ok(x.to_string()),
            other => Err(mismatch(column, "string", other.kind())),
        }
    }
}

fn mismatch(column: String, expected: &'static str, found: &'static str) -> Error {
    Error::TypeMismatch {
        column,
        expected,
        found,
    }
}

/// A forward-only cursor over the rows of one execution.
///
/// A cursor is only valid while the statement handle that produced it is
/// open. Once the handle closes, the next read fails with
/// [`Error::ClosedHandle`] and iteration stops.
#[derive(Debug)]
pub struct Cursor {
    columns: Rc<[String]>,
    rows: std::vec::IntoIter<Vec<Value>>,
    owner: Weak<()>,
    exhausted: bool,
}

impl Cursor {
    pub(crate) fn new(set: RowSet, owner: Weak<()>) -> Self {
        Self {
            columns: set.columns.into(),
            rows: set.rows.into_iter(),
            owner,
            exhausted: false,
        }
    }

    /// Returns the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Advances to the next row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClosedHandle`] if the owning handle has been closed.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.owner.strong_count() == 0 {
            return Err(Error::ClosedHandle);
        }
        Ok(self.rows.next().map(|values| Row {
            columns: Rc::clone(&self.columns),
            values,
        }))
    }
}

impl Iterator for Cursor {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let item = self.next_row().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.exhausted = true;
        }
        item
    }
}
