use async_trait::async_trait;
use bookmarks_core::{Bookmark, BookmarkPatch};
use bookmarks_storage::{BookmarkStorage, FindManyResult, QueryPredicate, StorageError};
use papaya::HashMap as PapayaHashMap;
use uuid::Uuid;

use crate::query;

/// In-memory bookmark storage backend using papaya lock-free HashMap.
///
/// Suitable for development and tests; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    data: PapayaHashMap<Uuid, Bookmark>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored bookmarks.
    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookmarkStorage for InMemoryStorage {
    async fn find_many(&self, predicate: &QueryPredicate) -> Result<FindManyResult, StorageError> {
        let guard = self.data.pin();
        let result = query::execute(guard.values(), predicate);
        tracing::debug!(count = result.count, rows = result.len(), "in-memory find_many");
        Ok(result)
    }

    async fn find_by_key(&self, guid: Uuid) -> Result<Option<Bookmark>, StorageError> {
        Ok(self.data.pin().get(&guid).cloned())
    }

    async fn create(&self, bookmark: &Bookmark) -> Result<Bookmark, StorageError> {
        let guard = self.data.pin();
        match guard.try_insert(bookmark.guid, bookmark.clone()) {
            Ok(stored) => Ok(stored.clone()),
            Err(_) => Err(StorageError::already_exists(bookmark.guid)),
        }
    }

    async fn update(&self, guid: Uuid, patch: &BookmarkPatch) -> Result<Bookmark, StorageError> {
        let guard = self.data.pin();
        guard
            .update(guid, |current| {
                let mut next = current.clone();
                next.apply(patch);
                next
            })
            .cloned()
            .ok_or_else(|| StorageError::not_found(guid))
    }

    async fn delete(&self, guid: Uuid) -> Result<(), StorageError> {
        match self.data.pin().remove(&guid) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(guid)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
