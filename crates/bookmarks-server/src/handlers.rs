use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, RawQuery, State, rejection::BytesRejection},
    http::StatusCode,
    response::IntoResponse,
};
use bookmarks_api::{ApiError, CreatedResponse, ListResponse, MetadataResponse};
use bookmarks_core::{generate_guid, now_millis};
use bookmarks_storage::DynStorage;
use bookmarks_validation::{BookmarkEngine, EngineError, ParameterSet, ValidationErrors};
use serde::Serialize;
use serde_json::{Value, json};
use url::Url;

use crate::enrichment::MetadataProvider;

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
    pub engine: Arc<BookmarkEngine>,
    pub metadata: Arc<dyn MetadataProvider>,
}

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Bookmarks Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "status": "ready",
        "storage": state.storage.backend_name(),
    });
    (StatusCode::OK, Json(body))
}

// ---- Bookmarks ----

fn path_params(guid: String) -> ParameterSet {
    ParameterSet::from_pairs([("guid", Value::String(guid))])
}

/// `GET /api/v1/bookmarks`
pub async fn list_bookmarks(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ListResponse>, ApiError> {
    let params = ParameterSet::from_query(query.as_deref().unwrap_or_default());
    let predicate = state.engine.validate_list(&params)?;
    let result = state.storage.find_many(&predicate).await?;
    tracing::debug!(count = result.count, rows = result.len(), "bookmarks listed");

    let data = result
        .rows
        .iter()
        .map(|b| b.project(&predicate.fields))
        .collect();
    Ok(Json(ListResponse {
        length: result.count,
        data,
    }))
}

/// `POST /api/v1/bookmarks`
pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let body = ParameterSet::from_body(&body?)?;
    let bookmark = state
        .engine
        .validate_create(&body, generate_guid(), now_millis())?;
    let created = state.storage.create(&bookmark).await?;
    tracing::info!(guid = %created.guid, "bookmark created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(created.guid, created.created_at)),
    ))
}

/// `PATCH /api/v1/bookmarks/{guid}`
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let path = path_params(guid);
    let body = match ParameterSet::from_body(&body?) {
        Ok(body) => body,
        Err(err) => {
            // Keep reporting order: body first, then path.
            let mut errors = ValidationErrors::from(err);
            if let Err(EngineError::Validation(path_errors)) = state.engine.validate_guid(&path) {
                errors.append(path_errors);
            }
            return Err(errors.into());
        }
    };
    let (guid, patch) = state.engine.validate_update(&path, &body, now_millis())?;
    state.storage.update(guid, &patch).await?;
    tracing::info!(%guid, "bookmark updated");
    Ok(Json(json!({})))
}

/// `DELETE /api/v1/bookmarks/{guid}`
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let guid = state.engine.validate_guid(&path_params(guid))?;
    state.storage.delete(guid).await?;
    tracing::info!(%guid, "bookmark deleted");
    Ok(Json(json!({})))
}

/// `GET /api/v1/bookmarks/{guid}`: WHOIS and Open Graph data for one bookmark.
pub async fn bookmark_metadata(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let guid = state.engine.validate_guid(&path_params(guid))?;
    let bookmark = state
        .storage
        .find_by_key(guid)
        .await?
        .ok_or(ApiError::NotFound)?;

    let host = Url::parse(&bookmark.link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .ok_or_else(|| ApiError::metadata(format!("link has no host: {}", bookmark.link)))?;

    let whois = state.metadata.whois(&host).await.map_err(|e| {
        tracing::warn!(%guid, %host, error = %e, "whois lookup failed");
        ApiError::metadata(e.to_string())
    })?;
    let og_preview = state.metadata.open_graph(&bookmark.link).await.map_err(|e| {
        tracing::warn!(%guid, link = %bookmark.link, error = %e, "open graph lookup failed");
        ApiError::metadata(e.to_string())
    })?;

    Ok(Json(MetadataResponse { whois, og_preview }))
}
