//! Common types used across the SDK.

use serde::{Deserialize, Serialize};

/// Envelope used by list endpoints: `{"items": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList<T> {
    /// Items returned by the server.
    pub items: Vec<T>,
}

impl<T> ItemList<T> {
    /// Creates a list envelope from items.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Unwraps the envelope.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Offset pagination for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of items to skip.
    pub offset: u64,

    /// Maximum number of items to return.
    pub limit: u32,
}

impl Pagination {
    /// Default page size used by the record pager.
    pub const DEFAULT_LIMIT: u32 = 100;

    /// Creates pagination with offset and limit.
    #[must_use]
    pub fn new(offset: u64, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Returns the pagination for the page after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + u64::from(self.limit),
            limit: self.limit,
        }
    }

    /// Renders the query-string fragment.
    #[must_use]
    pub fn to_query(self) -> String {
        format!("offset={}&limit={}", self.offset, self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
