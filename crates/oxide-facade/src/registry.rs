//! Registry of the statement handles opened through a session.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::statement::StatementHandle;

/// Owns every handle a session opens, in opening order, until bulk release.
///
/// The registry is only consulted for cleanup. Handles closed explicitly by
/// the caller stay registered; releasing them again is a no-op.
#[derive(Debug, Default)]
pub struct StatementRegistry {
    handles: Vec<StatementHandle>,
}

impl StatementRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Takes ownership of a handle and returns it for immediate use.
    pub fn register(&mut self, handle: StatementHandle) -> &mut StatementHandle {
        self.handles.push(handle);
        let last = self.handles.len() - 1;
        &mut self.handles[last]
    }

    /// Returns the number of registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if no handle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the number of registered handles that are still open.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_closed()).count()
    }

    /// Closes every handle, earliest first, and empties the registry.
    ///
    /// A failing close does not stop the remaining ones; the registry is
    /// empty afterwards either way.
    ///
    /// # Errors
    ///
    /// Returns the failure when one handle failed to close, or
    /// [`Error::Multiple`] when several did.
    pub fn release_all(&mut self) -> Result<()> {
        let total = self.handles.len();
        let mut errors = Vec::new();
        for mut handle in self.handles.drain(..) {
            if let Err(err) = handle.close() {
                warn!(sql = %handle.sql(), error = %err, "Failed to close statement");
                errors.push(err);
            }
        }
        debug!(total, failed = errors.len(), "Released statements");
        Error::collect(errors)
    }
}
