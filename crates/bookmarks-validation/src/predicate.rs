//! Turns a validated list request into a storage predicate.

use bookmarks_storage::{
    Condition, FilterValue, OrderBy, QueryField, QueryPredicate, SortDirection,
};
use serde_json::Value;
use thiserror::Error;

use crate::cross_field::{FILTER, FILTER_FROM, FILTER_TO, FILTER_VALUE};
use crate::params::ParameterSet;
use crate::rules::coerce_integer;

pub const DEFAULT_LIMIT: u64 = 50;

/// Input reached the builder that validation should have rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("predicate contract violated: {message}")]
pub struct ContractViolation {
    pub message: String,
}

impl ContractViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateBuilder {
    default_limit: u64,
}

impl Default for PredicateBuilder {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl PredicateBuilder {
    pub fn new(default_limit: u64) -> Self {
        Self { default_limit }
    }

    /// Builds the predicate. Call only after the list table reported no errors.
    pub fn build(&self, params: &ParameterSet) -> Result<QueryPredicate, ContractViolation> {
        let limit = unsigned(params, "limit")?.unwrap_or(self.default_limit);
        let offset = unsigned(params, "offset")?.unwrap_or(0);

        let sort_field = match present_str(params, "sort_by")? {
            Some(name) => QueryField::parse(name)
                .ok_or_else(|| ContractViolation::new(format!("unknown sort field {name:?}")))?,
            None => QueryField::CreatedAt,
        };
        let direction = match present_str(params, "sort_dir")? {
            Some(dir) => SortDirection::parse(dir)
                .ok_or_else(|| ContractViolation::new(format!("unknown sort direction {dir:?}")))?,
            None => SortDirection::Asc,
        };

        let predicate = QueryPredicate::new(OrderBy::new(sort_field, direction), offset, limit);
        match Self::condition(params)? {
            Some(condition) => Ok(predicate.with_condition(condition)),
            None => Ok(predicate),
        }
    }

    fn condition(params: &ParameterSet) -> Result<Option<Condition>, ContractViolation> {
        let Some(name) = present_str(params, FILTER)? else {
            return Ok(None);
        };
        let field = QueryField::parse(name)
            .ok_or_else(|| ContractViolation::new(format!("unknown filter field {name:?}")))?;

        match field {
            QueryField::Favorites => {
                let value = present_str(params, FILTER_VALUE)?
                    .ok_or_else(|| ContractViolation::new("favorites filter without filter_value"))?;
                Ok(Some(Condition::eq(field, FilterValue::Bool(value == "true"))))
            }
            QueryField::CreatedAt => {
                if let Some(value) = integer(params, FILTER_VALUE)? {
                    return Ok(Some(Condition::eq(field, FilterValue::Int(value))));
                }
                let gte = integer(params, FILTER_FROM)?;
                let lte = integer(params, FILTER_TO)?;
                if gte.is_none() && lte.is_none() {
                    return Err(ContractViolation::new("createdAt filter without operands"));
                }
                Ok(Some(Condition::range(field, gte, lte)))
            }
        }
    }
}

fn unsigned(params: &ParameterSet, field: &str) -> Result<Option<u64>, ContractViolation> {
    integer(params, field)?
        .map(|n| u64::try_from(n).map_err(|_| ContractViolation::new(format!("{field} is negative"))))
        .transpose()
}

fn present<'a>(params: &'a ParameterSet, field: &str) -> Option<&'a Value> {
    params.get(field).filter(|_| params.is_present(field))
}

fn present_str<'a>(params: &'a ParameterSet, field: &str) -> Result<Option<&'a str>, ContractViolation> {
    present(params, field)
        .map(|v| {
            v.as_str()
                .map(str::trim)
                .ok_or_else(|| ContractViolation::new(format!("{field} is not a string")))
        })
        .transpose()
}

fn integer(params: &ParameterSet, field: &str) -> Result<Option<i64>, ContractViolation> {
    present(params, field)
        .map(|v| {
            coerce_integer(v)
                .map_err(|e| ContractViolation::new(format!("{field}: {}", e.reason())))
        })
        .transpose()
}
