//! In-memory bookmark storage backend.
//!
//! This crate provides an in-memory implementation of the `BookmarkStorage`
//! trait from `bookmarks-storage`, using papaya lock-free HashMap for
//! concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use bookmarks_db_memory::InMemoryStorage;
//! use bookmarks_storage::BookmarkStorage;
//!
//! let storage = InMemoryStorage::new();
//! let created = storage.create(&bookmark).await?;
//! ```

pub mod query;
pub mod storage;

pub use bookmarks_storage::{BookmarkStorage, StorageError};
pub use storage::InMemoryStorage;

/// Creates a new shareable in-memory storage.
pub fn create_storage() -> bookmarks_storage::DynStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
