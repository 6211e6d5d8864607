//! Injectable time source for request timestamps.

use chrono::{DateTime, Utc};

/// Format of the `date` header and of the signing timestamp.
pub const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    /// Current time. Called once per request, right before signing.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Render a timestamp as `YYYYMMDDTHHMMSSZ`.
#[must_use]
pub fn format_amz_date(at: DateTime<Utc>) -> String {
    at.format(AMZ_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_amz_date() {
        let at = Utc.with_ymd_and_hms(2012, 6, 1, 9, 5, 3).unwrap();
        assert_eq!(format_amz_date(at), "20120601T090503Z");
    }

    #[test]
    fn test_system_clock_is_current() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
        assert!((now - before).num_seconds() < 1);
    }
}
