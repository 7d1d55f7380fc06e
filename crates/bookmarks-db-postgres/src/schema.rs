//! Schema management for the `bookmarks` table.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::{info, instrument, warn};

use crate::error::{PostgresError, Result};

pub const TABLE: &str = "bookmarks";

const CREATE_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS bookmarks (
    guid UUID PRIMARY KEY,
    link VARCHAR(256) NOT NULL,
    "createdAt" BIGINT NOT NULL,
    "updatedAt" BIGINT NOT NULL,
    description TEXT,
    favorites BOOLEAN NOT NULL DEFAULT false
)"#;

const CREATE_INDEXES: [&str; 2] = [
    r#"CREATE INDEX IF NOT EXISTS bookmarks_created_at_idx ON bookmarks ("createdAt")"#,
    "CREATE INDEX IF NOT EXISTS bookmarks_favorites_idx ON bookmarks (favorites)",
];

const DROP_TABLE: &str = "DROP TABLE IF EXISTS bookmarks";

/// Ensures the table and its indexes exist.
///
/// With `force_sync` the table is dropped first, discarding all rows.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool, force_sync: bool) -> Result<()> {
    if force_sync {
        warn!("force_sync enabled, dropping bookmarks table");
        query(DROP_TABLE)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::schema(format!("drop {TABLE}: {e}")))?;
    }

    query(CREATE_TABLE)
        .execute(pool)
        .await
        .map_err(|e| PostgresError::schema(format!("create {TABLE}: {e}")))?;

    for ddl in CREATE_INDEXES {
        query(ddl)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::schema(format!("create index: {e}")))?;
    }

    info!(table = TABLE, "Schema ready");
    Ok(())
}
