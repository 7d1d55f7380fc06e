use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable machine-readable codes for input validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "BOOKMARKS_INVALID_LINK")]
    InvalidLink,
    #[serde(rename = "BOOKMARKS_BLOCKED_DOMAIN")]
    BlockedDomain,
    #[serde(rename = "BOOKMARKS_INPUT_INVALID")]
    InputInvalid,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidLink => "BOOKMARKS_INVALID_LINK",
            Self::BlockedDomain => "BOOKMARKS_BLOCKED_DOMAIN",
            Self::InputInvalid => "BOOKMARKS_INPUT_INVALID",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One coded failure, reported per failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub description: String,
}

impl ValidationError {
    #[must_use]
    pub fn invalid_link() -> Self {
        Self {
            code: ErrorCode::InvalidLink,
            description: "invalid link".to_string(),
        }
    }

    #[must_use]
    pub fn blocked_domain(host: &str) -> Self {
        Self {
            code: ErrorCode::BlockedDomain,
            description: format!("\"{host}\" banned"),
        }
    }

    /// Generic failure rendered as `<field>: <reasons>`.
    #[must_use]
    pub fn input_invalid(field: &str, reasons: &str) -> Self {
        Self {
            code: ErrorCode::InputInvalid,
            description: format!("{field}: {reasons}"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.code)
    }
}

/// Ordered collection of validation errors. Never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Appends `other` after the errors already collected.
    pub fn append(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
