//! Per-endpoint constraint tables.

use std::sync::Arc;

use crate::classifier::classify;
use crate::cross_field::{self, FILTER, FILTER_FROM, FILTER_TO, FILTER_VALUE};
use crate::error::ValidationErrors;
use crate::link::{self, LinkMode};
use crate::params::ParameterSet;
use crate::rules::{self, Failure, Rule, evaluate};

/// Ordered `(field, rules)` entries evaluated for one endpoint.
///
/// Every field is evaluated and every rule of a field runs; errors come out
/// in table order regardless of the order of the input.
#[derive(Debug, Default)]
pub struct ConstraintTable {
    entries: Vec<(&'static str, Vec<Rule>)>,
}

impl ConstraintTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.entries.push((name, rules));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// List query: pagination, single-field filter, sort.
    pub fn list(max_limit: Option<u64>) -> Self {
        let max = max_limit.map(|m| i64::try_from(m).unwrap_or(i64::MAX));
        Self::new()
            .field("limit", vec![rules::integer_range(1, max)])
            .field("offset", vec![rules::integer_range(0, None)])
            .field(FILTER, vec![cross_field::filter()])
            .field(FILTER_VALUE, vec![cross_field::filter_operand()])
            .field(FILTER_FROM, vec![cross_field::filter_operand()])
            .field(FILTER_TO, vec![cross_field::filter_operand()])
            .field("sort_by", vec![rules::sort_field()])
            .field("sort_dir", vec![rules::sort_direction()])
    }

    /// Create body: `link` is required.
    pub fn create(blocked: Arc<[String]>) -> Self {
        Self::write(LinkMode::Required, blocked)
    }

    /// Update body: an empty `link` leaves the stored one unchanged.
    pub fn update(blocked: Arc<[String]>) -> Self {
        Self::write(LinkMode::AllowEmpty, blocked)
    }

    fn write(mode: LinkMode, blocked: Arc<[String]>) -> Self {
        Self::new()
            .field("link", vec![link::link(mode, blocked)])
            .field("description", vec![rules::text()])
            .field("favorites", vec![rules::boolean()])
    }

    /// Path parameters.
    pub fn path() -> Self {
        Self::new().field("guid", vec![rules::required(), rules::uuid_v4()])
    }

    pub fn validate(&self, params: &ParameterSet) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (field, rules) in &self.entries {
            let value = params.get(field);
            let failures: Vec<Failure> = rules
                .iter()
                .filter_map(|rule| evaluate(field, value, params, rule))
                .collect();
            if let Some(error) = classify(field, &failures) {
                errors.push(error);
            }
        }
        errors
    }
}
