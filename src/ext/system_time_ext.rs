use std::time::{Duration, SystemTime};

pub trait SystemTimeExt {
    /// Coarse human readable age of this timestamp relative to `now`,
    /// e.g. `42s`, `5m`, `3h` or `12d`. Timestamps in the future read as `0s`.
    fn age_display(&self, now: SystemTime) -> String;
}

impl SystemTimeExt for SystemTime {
    fn age_display(&self, now: SystemTime) -> String {
        let age = now.duration_since(*self).unwrap_or(Duration::ZERO).as_secs();
        match age {
            0..60 => format!("{age}s"),
            60..3_600 => format!("{}m", age / 60),
            3_600..86_400 => format!("{}h", age / 3_600),
            _ => format!("{}d", age / 86_400),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0, "0s")]
    #[case(59, "59s")]
    #[case(60, "1m")]
    #[case(3_599, "59m")]
    #[case(7_200, "2h")]
    #[case(86_400 * 3 + 5, "3d")]
    fn test_age_display(#[case] seconds_ago: u64, #[case] expected: &str) {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let then = now - Duration::from_secs(seconds_ago);
        assert_eq!(then.age_display(now), expected);
    }

    #[test]
    fn test_age_display_future_timestamp() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let later = now + Duration::from_secs(50);
        assert_eq!(later.age_display(now), "0s");
    }
}
