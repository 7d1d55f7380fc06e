//! Result types returned by storage backends.

use bookmarks_core::Bookmark;
use serde::{Deserialize, Serialize};

/// Result of a `find_many` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindManyResult {
    /// Number of bookmarks matching the condition, before offset/limit.
    pub count: u64,
    /// The requested page, in predicate order.
    pub rows: Vec<Bookmark>,
}

impl FindManyResult {
    /// Creates a new empty `FindManyResult`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(count: u64, rows: Vec<Bookmark>) -> Self {
        Self { count, rows }
    }

    /// Returns the number of rows in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this page has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
