use chrono::{DateTime, Utc};

/// Convert a host epoch-seconds column where `0` (or less) means "never".
#[must_use]
pub fn timestamp_or_none(secs: i64) -> Option<DateTime<Utc>> {
    if secs > 0 {
        DateTime::<Utc>::from_timestamp(secs, 0)
    } else {
        None
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
#[cfg(test)]
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_mean_never() {
        assert_eq!(timestamp_or_none(0), None);
        assert_eq!(timestamp_or_none(-5), None);
        assert_eq!(timestamp_or_none(FIXED_TEST_TIMESTAMP), Some(fixed_now()));
    }
}
