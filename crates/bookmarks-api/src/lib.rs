use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bookmarks_storage::StorageError;
use bookmarks_validation::{EngineError, ValidationError, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub const NOT_FOUND_CODE: &str = "ERROR_NOTFOUND";
pub const METADATA_CODE: &str = "ERROR_METADATA";
pub const DATABASE_CODE: &str = "DATABASE_ERROR";
pub const BACKEND_CODE: &str = "BACKEND_ERROR";
pub const NOT_FOUND_DESCRIPTION: &str = "bookmark not found";

// -------------------------
// Error envelope
// -------------------------

/// One entry of the `errors` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorItem {
    pub code: String,
    pub description: String,
}

impl ErrorItem {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

impl From<&ValidationError> for ErrorItem {
    fn from(err: &ValidationError) -> Self {
        Self::new(err.code.as_str(), err.description.clone())
    }
}

/// `{"errors": [...]}`, the body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorItem>,
}

impl ErrorEnvelope {
    pub fn single(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorItem::new(code, description)],
        }
    }
}

/// High-level API errors mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("request body rejected: {error}")]
    BodyRejected {
        status: StatusCode,
        error: ValidationError,
    },
    #[error("bookmark not found")]
    NotFound,
    #[error("metadata lookup failed: {0}")]
    Metadata(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl ApiError {
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BodyRejected { status, .. } => *status,
            // Every other failure, storage and backend included, is a 400.
            ApiError::Validation(_)
            | ApiError::Metadata(_)
            | ApiError::Database(_)
            | ApiError::Backend(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        match self {
            ApiError::Validation(errors) => ErrorEnvelope {
                errors: errors.iter().map(ErrorItem::from).collect(),
            },
            ApiError::BodyRejected { error, .. } => ErrorEnvelope {
                errors: vec![ErrorItem::from(error)],
            },
            ApiError::NotFound => ErrorEnvelope::single(NOT_FOUND_CODE, NOT_FOUND_DESCRIPTION),
            ApiError::Metadata(msg) => ErrorEnvelope::single(METADATA_CODE, msg),
            ApiError::Database(msg) => ErrorEnvelope::single(DATABASE_CODE, msg),
            ApiError::Backend(msg) => ErrorEnvelope::single(BACKEND_CODE, msg),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.into())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(errors) => Self::Validation(errors),
            EngineError::Contract(msg) => {
                tracing::error!(error = %msg, "validation engine contract violated");
                Self::Backend(msg)
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        let reason = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "exceeds the size limit"
        } else {
            "could not be read"
        };
        tracing::debug!(%status, detail = %rejection.body_text(), "request body rejected");
        Self::BodyRejected {
            status,
            error: ValidationError::input_invalid("body", reason),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_not_found() {
            return Self::NotFound;
        }
        tracing::error!(error = %err, category = %err.category(), "storage failure");
        Self::Database(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::to_vec(&self.to_envelope()).unwrap_or_else(|_| b"{\"errors\":[]}".to_vec());

        let mut response = Response::new(axum::body::Body::from(body));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}

// -------------------------
// Success payloads
// -------------------------

/// `GET /` response: total matching count plus the requested page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse {
    pub length: u64,
    pub data: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBookmark {
    pub guid: Uuid,
    pub created_at: i64,
}

/// `POST /` response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedResponse {
    pub data: CreatedBookmark,
}

impl CreatedResponse {
    pub fn new(guid: Uuid, created_at: i64) -> Self {
        Self {
            data: CreatedBookmark { guid, created_at },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenGraph {
    pub title: String,
    pub image: String,
    pub description: String,
}

/// `GET /{guid}` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataResponse {
    pub whois: Value,
    #[serde(rename = "og-preview")]
    pub og_preview: OpenGraph,
}
