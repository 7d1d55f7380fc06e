//! Connection pool for the bookmarks table.

use std::time::Duration;

use sqlx_core::pool::PoolOptions;
use sqlx_postgres::{PgPool, Postgres};
use tracing::instrument;
use url::Url;

use crate::config::PostgresConfig;
use crate::error::{PostgresError, Result};

/// Pool settings driven by `[storage.postgres]`; everything else keeps sqlx defaults.
pub fn pool_options(config: &PostgresConfig) -> Result<PoolOptions<Postgres>> {
    if config.pool_size == 0 {
        return Err(PostgresError::config("pool_size must be greater than 0"));
    }
    Ok(PoolOptions::<Postgres>::new()
        .max_connections(config.pool_size)
        .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
        .idle_timeout(config.idle_timeout_ms.map(Duration::from_millis)))
}

#[instrument(skip(config), fields(url = %mask_password(&config.url), pool_size = config.pool_size))]
pub async fn create_pool(config: &PostgresConfig) -> Result<PgPool> {
    let pool = pool_options(config)?.connect(&config.url).await?;
    tracing::info!("PostgreSQL pool ready");
    Ok(pool)
}

/// Database URL with any password replaced, safe to log.
pub fn mask_password(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            // Only cannot-be-a-base URLs refuse a password, and those carry none.
            let _ = url.set_password(Some("****"));
            url.into()
        }
        Ok(_) => raw.to_string(),
        Err(_) => "<invalid database url>".to_string(),
    }
}
