pub mod config;
pub mod enrichment;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use enrichment::{EnrichmentError, HttpMetadataProvider, MetadataProvider};
pub use handlers::AppState;
pub use server::{BookmarksServer, ServerBuilder, build_app, build_router, build_state};
