//! # bookmarks-storage
//!
//! Storage abstraction layer for the bookmarks service.
//!
//! This crate defines the traits and types that all storage backends must implement.
//! It does not contain any implementations - those are provided by separate crates.
//!
//! ## Overview
//!
//! The main trait is [`BookmarkStorage`], which defines the contract for:
//! - listing bookmarks through a [`QueryPredicate`]
//! - point lookups by guid
//! - create, partial update and delete
//!
//! ## Example
//!
//! ```ignore
//! use bookmarks_storage::{BookmarkStorage, QueryPredicate, StorageError};
//!
//! async fn first_page(
//!     storage: &dyn BookmarkStorage,
//!     predicate: &QueryPredicate,
//! ) -> Result<u64, StorageError> {
//!     let result = storage.find_many(predicate).await?;
//!     Ok(result.count)
//! }
//! ```

mod error;
mod predicate;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use predicate::{
    Comparison, Condition, FilterValue, OrderBy, QueryField, QueryPredicate, SortDirection,
};
pub use traits::BookmarkStorage;
pub use types::FindManyResult;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn BookmarkStorage>;
