//! Generic SQL dialect.

use super::Dialect;

/// A dialect relying on the ANSI `information_schema`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn table_exists_sql(&self) -> &'static str {
        "SELECT table_name FROM information_schema.tables WHERE table_name = ?"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.parameter_placeholder(), "?");
        assert!(dialect.table_exists_sql().ends_with("= ?"));
    }
}
