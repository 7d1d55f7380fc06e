//! Predicate evaluation over an in-memory snapshot.

use bookmarks_core::Bookmark;
use bookmarks_storage::{FindManyResult, QueryPredicate};

/// Filters, sorts, counts, then pages `rows` according to `predicate`.
pub fn execute<'a, I>(rows: I, predicate: &QueryPredicate) -> FindManyResult
where
    I: IntoIterator<Item = &'a Bookmark>,
{
    let mut matched: Vec<&Bookmark> = rows.into_iter().filter(|b| predicate.matches(b)).collect();
    matched.sort_by(|a, b| predicate.order_by.compare(a, b));

    let count = matched.len() as u64;
    let offset = usize::try_from(predicate.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(predicate.limit).unwrap_or(usize::MAX);
    let rows = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    FindManyResult::new(count, rows)
}
