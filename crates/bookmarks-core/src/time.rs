use time::OffsetDateTime;

/// Current wall-clock time as milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_millis_is_after_2020_and_monotone_enough() {
        let a = now_millis();
        let b = now_millis();
        // 2020-01-01T00:00:00Z
        assert!(a > 1_577_836_800_000);
        assert!(b >= a);
    }
}
