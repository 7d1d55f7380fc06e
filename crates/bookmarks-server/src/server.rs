use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{Router, middleware, routing::get};
use bookmarks_db_postgres::{PostgresStorage, mask_password};
use bookmarks_storage::DynStorage;
use bookmarks_validation::BookmarkEngine;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, StorageBackend};
use crate::enrichment::{HttpMetadataProvider, MetadataProvider};
use crate::handlers::{self, AppState};
use crate::middleware as app_middleware;

pub const API_BASE: &str = "/api/v1/bookmarks";

pub struct BookmarksServer {
    addr: SocketAddr,
    app: Router,
}

/// Routes and middleware over an already assembled state.
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    let collection = get(handlers::list_bookmarks).post(handlers::create_bookmark);
    let item = get(handlers::bookmark_metadata)
        .patch(handlers::update_bookmark)
        .delete(handlers::delete_bookmark);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Bookmarks
        .route(API_BASE, collection.clone())
        .route(&format!("{API_BASE}/"), collection)
        .route(&format!("{API_BASE}/{{guid}}"), item)
        .with_state(state)
        // Outermost first: body limit -> request id -> trace -> compression -> cors
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn(app_middleware::request_id))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &axum::http::Request<_>| {
                            use tracing::field::Empty;
                            let req_id = req
                                .extensions()
                                .get::<axum::http::HeaderValue>()
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("")
                                .to_string();
                            tracing::info_span!(
                                "http.request",
                                http.method = %req.method(),
                                http.target = %req.uri(),
                                http.status_code = Empty,
                                request_id = %req_id
                            )
                        })
                        .on_response(
                            |res: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             span: &tracing::Span| {
                                span.record(
                                    "http.status_code",
                                    tracing::field::display(res.status().as_u16()),
                                );
                                tracing::info!(
                                    http.status = %res.status().as_u16(),
                                    elapsed_ms = %latency.as_millis(),
                                    "request handled"
                                );
                            },
                        ),
                )
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

/// Opens the configured storage backend.
pub async fn create_storage(cfg: &AppConfig) -> anyhow::Result<DynStorage> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Ok(bookmarks_db_memory::create_storage())
        }
        StorageBackend::Postgres => {
            let pg = cfg
                .storage
                .postgres
                .as_ref()
                .context("storage.postgres is not configured")?;
            let url = pg.connection_url();
            tracing::info!(url = %mask_password(&url), "connecting to PostgreSQL");
            let storage = PostgresStorage::new(pg.to_postgres_config())
                .await
                .context("failed to initialize PostgreSQL storage")?;
            Ok(Arc::new(storage))
        }
    }
}

pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let storage = create_storage(cfg).await?;
    let metadata = HttpMetadataProvider::new(&cfg.enrichment)
        .context("failed to build metadata client")?;
    Ok(AppState {
        storage,
        engine: Arc::new(BookmarkEngine::new(&cfg.engine_config())),
        metadata: Arc::new(metadata),
    })
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(cfg).await?;
    Ok(build_router(state, cfg.server.body_limit_bytes))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    storage: Option<DynStorage>,
    metadata: Option<Arc<dyn MetadataProvider>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            storage: None,
            metadata: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses `storage` instead of opening the configured backend.
    pub fn with_storage(mut self, storage: DynStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_metadata_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }

    pub async fn build(self) -> anyhow::Result<BookmarksServer> {
        let storage = match self.storage {
            Some(storage) => storage,
            None => create_storage(&self.config).await?,
        };
        let metadata: Arc<dyn MetadataProvider> = match self.metadata {
            Some(provider) => provider,
            None => Arc::new(
                HttpMetadataProvider::new(&self.config.enrichment)
                    .context("failed to build metadata client")?,
            ),
        };
        let state = AppState {
            storage,
            engine: Arc::new(BookmarkEngine::new(&self.config.engine_config())),
            metadata,
        };

        Ok(BookmarksServer {
            addr: self.addr,
            app: build_router(state, self.config.server.body_limit_bytes),
        })
    }
}

impl BookmarksServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
