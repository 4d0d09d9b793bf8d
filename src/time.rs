//! Wall-clock helpers.

use chrono::Utc;

/// Seconds since the Unix epoch.
pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_and_millis_agree() {
        let ms = now_millis();
        let s = now_seconds();
        assert!((ms / 1000 - s).abs() <= 1);
        assert!(s > 1_600_000_000);
    }
}
