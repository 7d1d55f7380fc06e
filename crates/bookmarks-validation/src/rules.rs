//! Rule evaluator and primitive rules.
//!
//! A [`Rule`] is an immutable named check over one field value. Rules may
//! read sibling fields through the read-only [`ParameterSet`] in the
//! [`RuleInput`]; they never mutate it. A missing value is valid for every
//! primitive rule.

use std::fmt;

use bookmarks_core::is_uuid_v4;
use serde_json::Value;

use crate::params::{ParameterSet, is_missing_value};

pub const SORT_FIELD_REASON: &str = "only createdAt and favorites supported";
pub const SORT_DIR_REASON: &str = "only asc and desc supported";
pub const BOOLEAN_REASON: &str = "only Boolean supported";
pub const UUID_REASON: &str = "invalid uuid";
pub const TEXT_REASON: &str = "must be a string";
pub const REQUIRED_REASON: &str = "can't be blank";
pub const NOT_A_NUMBER_REASON: &str = "is not a number";
pub const NOT_AN_INTEGER_REASON: &str = "must be an integer";
pub const OUT_OF_RANGE_REASON: &str = "is out of range";

/// Tagged outcome of a failing rule. The classifier matches on the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    InvalidLink,
    BlockedDomain { host: String },
    Invalid { reason: String },
}

impl Failure {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// What a rule sees: the field under test, its value, and the whole set.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub field: &'a str,
    pub value: Option<&'a Value>,
    pub params: &'a ParameterSet,
}

impl RuleInput<'_> {
    pub fn is_missing(&self) -> bool {
        is_missing_value(self.value)
    }
}

type CheckFn = dyn Fn(&RuleInput<'_>) -> Option<Failure> + Send + Sync;

pub struct Rule {
    name: &'static str,
    check: Box<CheckFn>,
}

impl Rule {
    pub fn new<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&RuleInput<'_>) -> Option<Failure> + Send + Sync + 'static,
    {
        Self {
            name,
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn check(&self, input: &RuleInput<'_>) -> Option<Failure> {
        (self.check)(input)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Evaluates one rule against one field value.
pub fn evaluate(
    field: &str,
    value: Option<&Value>,
    params: &ParameterSet,
    rule: &Rule,
) -> Option<Failure> {
    rule.check(&RuleInput {
        field,
        value,
        params,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    NotANumber,
    NotAnInteger,
    OutOfRange,
}

impl NumericError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotANumber => NOT_A_NUMBER_REASON,
            Self::NotAnInteger => NOT_AN_INTEGER_REASON,
            Self::OutOfRange => OUT_OF_RANGE_REASON,
        }
    }
}

/// Coerces a string or JSON number to an integer.
///
/// Strings are trimmed and may use decimal or exponent notation as long as
/// the value is integral (`"1e3"`, `"10.0"`).
pub fn coerce_integer(value: &Value) -> Result<i64, NumericError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                n.as_f64()
                    .ok_or(NumericError::NotANumber)
                    .and_then(integral)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            // Rust accepts "inf"/"nan" spellings; those are not numbers here.
            if !s.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) {
                return Err(NumericError::NotANumber);
            }
            s.parse::<f64>()
                .map_err(|_| NumericError::NotANumber)
                .and_then(integral)
        }
        _ => Err(NumericError::NotANumber),
    }
}

// -2^63 and 2^63, both exact in f64.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn integral(f: f64) -> Result<i64, NumericError> {
    if !f.is_finite() {
        Err(NumericError::NotANumber)
    } else if f.fract() != 0.0 {
        Err(NumericError::NotAnInteger)
    } else if !(I64_LOWER..I64_UPPER).contains(&f) {
        Err(NumericError::OutOfRange)
    } else {
        Ok(f as i64)
    }
}

/// Integer in `[min, max]` (no upper bound when `max` is `None`).
pub fn integer_range(min: i64, max: Option<i64>) -> Rule {
    Rule::new("integer_range", move |input| {
        if input.is_missing() {
            return None;
        }
        let n = match coerce_integer(input.value?) {
            Ok(n) => n,
            Err(e) => return Some(Failure::invalid(e.reason())),
        };
        if n < min {
            return Some(Failure::invalid(format!(
                "must be greater than or equal to {min}"
            )));
        }
        if let Some(max) = max
            && n > max
        {
            return Some(Failure::invalid(format!("must be less than or equal to {max}")));
        }
        None
    })
}

/// Membership in an enumerated set of strings.
pub fn one_of(allowed: &'static [&'static str], case_insensitive: bool, reason: &'static str) -> Rule {
    Rule::new("one_of", move |input| {
        if input.is_missing() {
            return None;
        }
        let hit = input.value.and_then(Value::as_str).is_some_and(|v| {
            allowed.iter().any(|a| {
                if case_insensitive {
                    a.eq_ignore_ascii_case(v)
                } else {
                    *a == v
                }
            })
        });
        (!hit).then(|| Failure::invalid(reason))
    })
}

pub fn sort_field() -> Rule {
    one_of(&["createdAt", "favorites"], false, SORT_FIELD_REASON)
}

pub fn sort_direction() -> Rule {
    one_of(&["asc", "desc"], true, SORT_DIR_REASON)
}

/// JSON `true` or `false` only; strings are rejected.
pub fn boolean() -> Rule {
    Rule::new("boolean", |input| {
        if input.is_missing() {
            return None;
        }
        (!matches!(input.value, Some(Value::Bool(_)))).then(|| Failure::invalid(BOOLEAN_REASON))
    })
}

pub fn uuid_v4() -> Rule {
    Rule::new("uuid_v4", |input| {
        if input.is_missing() {
            return None;
        }
        let ok = input.value.and_then(Value::as_str).is_some_and(is_uuid_v4);
        (!ok).then(|| Failure::invalid(UUID_REASON))
    })
}

pub fn text() -> Rule {
    Rule::new("text", |input| {
        if input.is_missing() {
            return None;
        }
        (!matches!(input.value, Some(Value::String(_)))).then(|| Failure::invalid(TEXT_REASON))
    })
}

pub fn required() -> Rule {
    Rule::new("required", |input| {
        input.is_missing().then(|| Failure::invalid(REQUIRED_REASON))
    })
}
