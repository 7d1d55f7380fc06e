//! PostgreSQL implementation of `BookmarkStorage`.

use async_trait::async_trait;
use bookmarks_core::{Bookmark, BookmarkPatch};
use bookmarks_storage::{BookmarkStorage, FindManyResult, QueryPredicate, StorageError};
use sqlx_core::error::Error as SqlxError;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgPool, Postgres};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::config::PostgresConfig;
use crate::error::{PostgresError, Result, is_unique_violation};
use crate::pool::create_pool;
use crate::queries::{BindValue, COLUMNS, render_count, render_select};
use crate::schema::ensure_schema;

type BookmarkRow = (Uuid, String, i64, i64, Option<String>, bool);

fn into_bookmark((guid, link, created_at, updated_at, description, favorites): BookmarkRow) -> Bookmark {
    Bookmark {
        guid,
        link,
        created_at,
        updated_at,
        description,
        favorites,
    }
}

fn storage_error(err: SqlxError) -> StorageError {
    error!(error = %err, "PostgreSQL query failed");
    PostgresError::from(err).into()
}

/// PostgreSQL bookmark storage.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects, then ensures the schema (honouring `force_sync`).
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        let pool = create_pool(&config).await?;
        ensure_schema(&pool, config.force_sync).await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool. The schema is assumed to exist.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BookmarkStorage for PostgresStorage {
    #[instrument(skip(self, predicate))]
    async fn find_many(&self, predicate: &QueryPredicate) -> std::result::Result<FindManyResult, StorageError> {
        let select = render_select(predicate);
        let mut rows_query = query_as::<Postgres, BookmarkRow>(&select.sql);
        for bind in &select.binds {
            rows_query = match *bind {
                BindValue::Int(v) => rows_query.bind(v),
                BindValue::Bool(v) => rows_query.bind(v),
            };
        }
        let rows = rows_query.fetch_all(&self.pool).await.map_err(storage_error)?;

        let count = render_count(predicate);
        let mut count_query = query_scalar::<Postgres, i64>(&count.sql);
        for bind in &count.binds {
            count_query = match *bind {
                BindValue::Int(v) => count_query.bind(v),
                BindValue::Bool(v) => count_query.bind(v),
            };
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(storage_error)?;
        let total = u64::try_from(total)
            .map_err(|_| StorageError::from(PostgresError::invalid_row("negative row count")))?;

        debug!(count = total, rows = rows.len(), "find_many");
        Ok(FindManyResult::new(total, rows.into_iter().map(into_bookmark).collect()))
    }

    #[instrument(skip(self))]
    async fn find_by_key(&self, guid: Uuid) -> std::result::Result<Option<Bookmark>, StorageError> {
        let sql = format!("SELECT {COLUMNS} FROM bookmarks WHERE guid = $1");
        let row: Option<BookmarkRow> = query_as(&sql)
            .bind(guid)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.map(into_bookmark))
    }

    #[instrument(skip(self, bookmark), fields(guid = %bookmark.guid))]
    async fn create(&self, bookmark: &Bookmark) -> std::result::Result<Bookmark, StorageError> {
        let sql = format!(
            r#"INSERT INTO bookmarks ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"#
        );
        let row: BookmarkRow = query_as(&sql)
            .bind(bookmark.guid)
            .bind(&bookmark.link)
            .bind(bookmark.created_at)
            .bind(bookmark.updated_at)
            .bind(&bookmark.description)
            .bind(bookmark.favorites)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::already_exists(bookmark.guid)
                } else {
                    storage_error(e)
                }
            })?;
        Ok(into_bookmark(row))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, guid: Uuid, patch: &BookmarkPatch) -> std::result::Result<Bookmark, StorageError> {
        let sql = format!(
            r#"UPDATE bookmarks SET
                link = COALESCE($2, link),
                description = COALESCE($3, description),
                favorites = COALESCE($4, favorites),
                "updatedAt" = $5
            WHERE guid = $1
            RETURNING {COLUMNS}"#
        );
        let row: Option<BookmarkRow> = query_as(&sql)
            .bind(guid)
            .bind(&patch.link)
            .bind(&patch.description)
            .bind(patch.favorites)
            .bind(patch.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        row.map(into_bookmark)
            .ok_or_else(|| StorageError::not_found(guid))
    }

    #[instrument(skip(self))]
    async fn delete(&self, guid: Uuid) -> std::result::Result<(), StorageError> {
        let result = query("DELETE FROM bookmarks WHERE guid = $1")
            .bind(guid)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(guid));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
