//! Storage traits for the bookmark storage abstraction layer.

use async_trait::async_trait;
use bookmarks_core::{Bookmark, BookmarkPatch};
use uuid::Uuid;

use crate::error::StorageError;
use crate::predicate::QueryPredicate;
use crate::types::FindManyResult;

/// The storage trait that all bookmark backends must implement.
///
/// Implementations must be thread-safe (`Send + Sync`). Backend failures are
/// reported as opaque [`StorageError`]s; callers never parse them.
///
/// # Example
///
/// ```ignore
/// use bookmarks_storage::{BookmarkStorage, StorageError};
///
/// async fn must_exist(storage: &dyn BookmarkStorage, guid: Uuid) -> Result<Bookmark, StorageError> {
///     storage
///         .find_by_key(guid)
///         .await?
///         .ok_or_else(|| StorageError::not_found(guid))
/// }
/// ```
#[async_trait]
pub trait BookmarkStorage: Send + Sync {
    /// Returns the matching count and the requested page.
    ///
    /// `count` ignores `offset`/`limit`; rows follow `predicate.order_by`.
    async fn find_many(&self, predicate: &QueryPredicate) -> Result<FindManyResult, StorageError>;

    /// Reads a bookmark by guid.
    ///
    /// Returns `None` if the bookmark does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing bookmarks.
    async fn find_by_key(&self, guid: Uuid) -> Result<Option<Bookmark>, StorageError>;

    /// Persists a new bookmark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the guid is taken.
    /// Returns `StorageError::InvalidRecord` if a storage constraint is violated.
    async fn create(&self, bookmark: &Bookmark) -> Result<Bookmark, StorageError>;

    /// Applies a partial update and returns the updated bookmark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bookmark does not exist.
    async fn update(&self, guid: Uuid, patch: &BookmarkPatch) -> Result<Bookmark, StorageError>;

    /// Deletes a bookmark by guid.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bookmark does not exist.
    async fn delete(&self, guid: Uuid) -> Result<(), StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that BookmarkStorage is object-safe
    fn _assert_storage_object_safe(_: &dyn BookmarkStorage) {}
}
