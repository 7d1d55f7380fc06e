use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::{CoreError, Result};

static UUID_V4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "(?i)^[0-9A-F]{8}-[0-9A-F]{4}-4[0-9A-F]{3}-[89AB][0-9A-F]{3}-[0-9A-F]{12}$",
    )
    .expect("uuid v4 pattern is valid")
});

/// Generates a fresh random (v4) bookmark guid.
pub fn generate_guid() -> Uuid {
    Uuid::new_v4()
}

/// Returns `true` if `value` is a hyphenated UUID v4 literal (any letter case).
pub fn is_uuid_v4(value: &str) -> bool {
    UUID_V4.is_match(value)
}

/// Parses a guid that has already passed [`is_uuid_v4`].
pub fn parse_guid(value: &str) -> Result<Uuid> {
    if !is_uuid_v4(value) {
        return Err(CoreError::invalid_guid(value));
    }
    Ok(Uuid::parse_str(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_guid_is_v4() {
        let guid = generate_guid();
        assert_eq!(guid.get_version_num(), 4);
        assert!(is_uuid_v4(&guid.to_string()));
    }

    #[test]
    fn pattern_is_case_insensitive() {
        assert!(is_uuid_v4("97f10d85-5d2f-4450-a0c4-307e8e9a991f"));
        assert!(is_uuid_v4("97F10D85-5D2F-4450-A0C4-307E8E9A991F"));
    }

    #[test]
    fn rejects_other_versions_and_garbage() {
        // version nibble 1
        assert!(!is_uuid_v4("97f10d85-5d2f-1450-a0c4-307e8e9a991f"));
        // variant nibble c
        assert!(!is_uuid_v4("97f10d85-5d2f-4450-c0c4-307e8e9a991f"));
        assert!(!is_uuid_v4("xyz"));
        assert!(!is_uuid_v4(""));
        assert!(!is_uuid_v4("97f10d855d2f4450a0c4307e8e9a991f"));
    }

    #[test]
    fn parse_guid_round_trips_through_display() {
        let guid = parse_guid("97F10D85-5D2F-4450-A0C4-307E8E9A991F").unwrap();
        assert_eq!(guid.to_string(), "97f10d85-5d2f-4450-a0c4-307e8e9a991f");
        assert!(matches!(parse_guid("xyz"), Err(CoreError::InvalidGuid(_))));
    }
}
