//! Rules whose outcome depends on sibling fields of the list request.

use serde_json::Value;

use crate::rules::{Failure, Rule, SORT_FIELD_REASON, coerce_integer};

pub const FILTER: &str = "filter";
pub const FILTER_VALUE: &str = "filter_value";
pub const FILTER_FROM: &str = "filter_from";
pub const FILTER_TO: &str = "filter_to";

pub const FILTER_VALUE_REQUIRED: &str = "filter_value must be set";
pub const FILTER_OPERAND_REQUIRED: &str = "filter_value or filter_to or filter_from must be set";
pub const FILTER_NOT_SET: &str = "filter field not set";
pub const FAVORITES_RANGE_UNUSED: &str = "is unused, use filter_value with favorites filter";
pub const FAVORITES_LITERAL: &str = "only true and false supported";
pub const OPERAND_NOT_INTEGER: &str = "values of filter must be integer";
pub const RANGE_WITH_VALUE: &str = "filter_value must be unset when doing range filter";
pub const RANGE_ORDER: &str = "filter range error: filter_from > filter_to";

/// Rule for `filter`: a known field with the operands it needs.
pub fn filter() -> Rule {
    Rule::new("filter", |input| {
        if input.is_missing() {
            return None;
        }
        let params = input.params;
        match input.value.and_then(Value::as_str) {
            Some("favorites") if params.is_missing(FILTER_VALUE) => {
                Some(Failure::invalid(FILTER_VALUE_REQUIRED))
            }
            Some("createdAt")
                if params.is_missing(FILTER_VALUE)
                    && params.is_missing(FILTER_FROM)
                    && params.is_missing(FILTER_TO) =>
            {
                Some(Failure::invalid(FILTER_OPERAND_REQUIRED))
            }
            Some("favorites" | "createdAt") => None,
            _ => Some(Failure::invalid(SORT_FIELD_REASON)),
        }
    })
}

/// Rule shared by `filter_value`, `filter_from` and `filter_to`.
pub fn filter_operand() -> Rule {
    Rule::new("filter_operand", |input| {
        if input.is_missing() {
            return None;
        }
        let params = input.params;
        let field = input.field;
        let value = input.value?;

        if params.is_missing(FILTER) {
            return Some(Failure::invalid(FILTER_NOT_SET));
        }

        if params.get_str(FILTER) == Some("favorites") {
            if field != FILTER_VALUE {
                return Some(Failure::invalid(FAVORITES_RANGE_UNUSED));
            }
            return match value.as_str() {
                Some("true" | "false") => None,
                _ => Some(Failure::invalid(FAVORITES_LITERAL)),
            };
        }

        let Ok(n) = coerce_integer(value) else {
            return Some(Failure::invalid(OPERAND_NOT_INTEGER));
        };

        let is_bound = field == FILTER_FROM || field == FILTER_TO;
        if is_bound && params.is_present(FILTER_VALUE) {
            return Some(Failure::invalid(RANGE_WITH_VALUE));
        }

        // A non-integer filter_to reports its own failure; no ordering check then.
        if field == FILTER_FROM
            && params.is_present(FILTER_TO)
            && let Some(to) = params.get(FILTER_TO)
            && let Ok(to) = coerce_integer(to)
            && n > to
        {
            return Some(Failure::invalid(RANGE_ORDER));
        }

        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::rules::evaluate;

    fn check(query: &str, field: &str, rule: &Rule) -> Option<Failure> {
        let params = ParameterSet::from_query(query);
        evaluate(field, params.get(field), &params, rule)
    }

    #[test]
    fn filter_requires_operands() {
        let rule = filter();
        assert_eq!(check("", FILTER, &rule), None);
        assert_eq!(check("filter=favorites&filter_value=true", FILTER, &rule), None);
        assert_eq!(
            check("filter=favorites", FILTER, &rule),
            Some(Failure::invalid(FILTER_VALUE_REQUIRED))
        );
        assert_eq!(
            check("filter=favorites&filter_from=1", FILTER, &rule),
            Some(Failure::invalid(FILTER_VALUE_REQUIRED))
        );
        assert_eq!(
            check("filter=createdAt", FILTER, &rule),
            Some(Failure::invalid(FILTER_OPERAND_REQUIRED))
        );
        assert_eq!(check("filter=createdAt&filter_to=5", FILTER, &rule), None);
        assert_eq!(
            check("filter=link&filter_value=1", FILTER, &rule),
            Some(Failure::invalid(SORT_FIELD_REASON))
        );
    }

    #[test]
    fn operand_needs_filter() {
        let rule = filter_operand();
        assert_eq!(check("filter_value=1", FILTER_VALUE, &rule), Some(Failure::invalid(FILTER_NOT_SET)));
        assert_eq!(check("filter_to=", FILTER_TO, &rule), None);
    }

    #[test]
    fn favorites_operands() {
        let rule = filter_operand();
        assert_eq!(check("filter=favorites&filter_value=false", FILTER_VALUE, &rule), None);
        assert_eq!(
            check("filter=favorites&filter_value=yes", FILTER_VALUE, &rule),
            Some(Failure::invalid(FAVORITES_LITERAL))
        );
        assert_eq!(
            check("filter=favorites&filter_value=true&filter_from=1", FILTER_FROM, &rule),
            Some(Failure::invalid(FAVORITES_RANGE_UNUSED))
        );
    }

    #[test]
    fn created_at_operands() {
        let rule = filter_operand();
        assert_eq!(check("filter=createdAt&filter_value=100", FILTER_VALUE, &rule), None);
        assert_eq!(
            check("filter=createdAt&filter_value=abc", FILTER_VALUE, &rule),
            Some(Failure::invalid(OPERAND_NOT_INTEGER))
        );
        assert_eq!(
            check("filter=createdAt&filter_value=1&filter_to=5", FILTER_TO, &rule),
            Some(Failure::invalid(RANGE_WITH_VALUE))
        );
        assert_eq!(
            check("filter=createdAt&filter_from=10&filter_to=5", FILTER_FROM, &rule),
            Some(Failure::invalid(RANGE_ORDER))
        );
        // ordering is checked on filter_from only
        assert_eq!(check("filter=createdAt&filter_from=10&filter_to=5", FILTER_TO, &rule), None);
        assert_eq!(check("filter=createdAt&filter_from=5&filter_to=5", FILTER_FROM, &rule), None);
        // numeric, not lexicographic: "9" < "10"
        assert_eq!(check("filter=createdAt&filter_from=9&filter_to=10", FILTER_FROM, &rule), None);
        assert_eq!(check("filter=createdAt&filter_from=9&filter_to=x", FILTER_FROM, &rule), None);
    }
}
