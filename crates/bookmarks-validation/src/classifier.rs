//! Maps the failures of one field to a single coded error.

use crate::error::ValidationError;
use crate::rules::Failure;

/// Classifies the failures collected for `field`.
///
/// Precedence: any invalid link, then the first blocked domain, otherwise a
/// generic error listing every reason joined with `,`. Returns `None` when
/// there are no failures.
pub fn classify(field: &str, failures: &[Failure]) -> Option<ValidationError> {
    if failures.is_empty() {
        return None;
    }
    if failures.iter().any(|f| matches!(f, Failure::InvalidLink)) {
        return Some(ValidationError::invalid_link());
    }
    if let Some(host) = failures.iter().find_map(|f| match f {
        Failure::BlockedDomain { host } => Some(host),
        _ => None,
    }) {
        return Some(ValidationError::blocked_domain(host));
    }
    let reasons: Vec<&str> = failures
        .iter()
        .filter_map(|f| match f {
            Failure::Invalid { reason } => Some(reason.as_str()),
            _ => None,
        })
        .collect();
    Some(ValidationError::input_invalid(field, &reasons.join(",")))
}
