use std::sync::Arc;

use bookmarks_core::{Bookmark, BookmarkPatch};
use bookmarks_storage::QueryPredicate;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::constraints::ConstraintTable;
use crate::error::{ValidationError, ValidationErrors};
use crate::link::DEFAULT_BLOCKED_HOSTS;
use crate::params::ParameterSet;
use crate::predicate::{ContractViolation, DEFAULT_LIMIT, PredicateBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub default_limit: u64,
    /// Upper bound for `limit`; `None` accepts any positive value.
    pub max_limit: Option<u64>,
    pub blocked_hosts: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
            blocked_hosts: DEFAULT_BLOCKED_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("contract violation: {0}")]
    Contract(String),
}

impl EngineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Contract(_) => None,
        }
    }
}

impl From<ContractViolation> for EngineError {
    fn from(err: ContractViolation) -> Self {
        Self::Contract(err.message)
    }
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ValidationError> for EngineError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.into())
    }
}

/// Stateless request validator. Tables are built once and shared read-only.
#[derive(Debug)]
pub struct BookmarkEngine {
    list: ConstraintTable,
    create: ConstraintTable,
    update: ConstraintTable,
    path: ConstraintTable,
    builder: PredicateBuilder,
}

impl Default for BookmarkEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl BookmarkEngine {
    pub fn new(config: &EngineConfig) -> Self {
        let blocked: Arc<[String]> = config.blocked_hosts.iter().cloned().collect();
        Self {
            list: ConstraintTable::list(config.max_limit),
            create: ConstraintTable::create(Arc::clone(&blocked)),
            update: ConstraintTable::update(blocked),
            path: ConstraintTable::path(),
            builder: PredicateBuilder::new(config.default_limit),
        }
    }

    /// Validates a list query and builds its predicate.
    pub fn validate_list(&self, params: &ParameterSet) -> Result<QueryPredicate, EngineError> {
        let errors = self.list.validate(params);
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "list query rejected");
            return Err(errors.into());
        }
        Ok(self.builder.build(params)?)
    }

    /// Validates a create body and returns the record to persist.
    pub fn validate_create(
        &self,
        body: &ParameterSet,
        guid: Uuid,
        now_ms: i64,
    ) -> Result<Bookmark, EngineError> {
        let errors = self.create.validate(body);
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "create body rejected");
            return Err(errors.into());
        }
        let link = body
            .get_str("link")
            .ok_or_else(|| EngineError::Contract("validated create body has no link".into()))?;
        let mut bookmark = Bookmark::new(guid, link, now_ms);
        if let Some(Value::String(description)) = body.get("description") {
            bookmark = bookmark.with_description(description.clone());
        }
        if let Some(Value::Bool(favorites)) = body.get("favorites") {
            bookmark = bookmark.with_favorites(*favorites);
        }
        Ok(bookmark)
    }

    /// Validates an update. Body errors are reported before path errors.
    pub fn validate_update(
        &self,
        path: &ParameterSet,
        body: &ParameterSet,
        now_ms: i64,
    ) -> Result<(Uuid, BookmarkPatch), EngineError> {
        let mut errors = self.update.validate(body);
        errors.append(self.path.validate(path));
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "update rejected");
            return Err(errors.into());
        }
        let guid = self.path_guid(path)?;

        let mut patch = BookmarkPatch::new(now_ms);
        if body.is_present("link") {
            patch.link = body.get_str("link").map(str::to_string);
        }
        if let Some(Value::String(description)) = body.get("description") {
            patch.description = Some(description.clone());
        }
        if let Some(Value::Bool(favorites)) = body.get("favorites") {
            patch.favorites = Some(*favorites);
        }
        Ok((guid, patch))
    }

    /// Validates the path guid of delete and metadata requests.
    pub fn validate_guid(&self, path: &ParameterSet) -> Result<Uuid, EngineError> {
        let errors = self.path.validate(path);
        if !errors.is_empty() {
            return Err(errors.into());
        }
        self.path_guid(path)
    }

    fn path_guid(&self, path: &ParameterSet) -> Result<Uuid, EngineError> {
        let raw = path
            .get_str("guid")
            .ok_or_else(|| EngineError::Contract("validated path has no guid".into()))?;
        bookmarks_core::parse_guid(raw).map_err(|e| EngineError::Contract(e.to_string()))
    }
}
