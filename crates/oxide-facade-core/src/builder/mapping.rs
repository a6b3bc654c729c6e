//! Insertion-ordered column/value mapping for INSERT and UPDATE.

use crate::schema::ColumnSpec;

use super::value::SqlValue;

/// An ordered mapping from columns to values.
///
/// Iteration follows insertion order. Inserting a column that is already
/// present replaces its value and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMapping {
    entries: Vec<(ColumnSpec, SqlValue)>,
}

impl ValueMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a column/value pair, builder style.
    #[must_use]
    pub fn with(mut self, column: &ColumnSpec, value: impl Into<SqlValue>) -> Self {
        self.insert(column.clone(), value);
        self
    }

    /// Adds a column/value pair, returning the previous value if the column
    /// was already mapped.
    pub fn insert(&mut self, column: ColumnSpec, value: impl Into<SqlValue>) -> Option<SqlValue> {
        let value = value.into();
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.name() == column.name())
        {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((column, value));
        None
    }

    /// Returns the value mapped to the named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| c.name() == column)
            .map(|(_, v)| v)
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnSpec, &SqlValue)> {
        self.entries.iter().map(|(c, v)| (c, v))
    }

    /// Iterates over the columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.entries.iter().map(|(c, _)| c)
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns the number of mapped columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no column is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Into<SqlValue>> FromIterator<(ColumnSpec, V)> for ValueMapping {
    fn from_iter<I: IntoIterator<Item = (ColumnSpec, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (column, value) in iter {
            mapping.insert(column, value);
        }
        mapping
    }
}
