//! Deterministic clock.

use chrono::{DateTime, TimeZone, Utc};
use glacier_client::Clock;

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock stopped at the given UTC date and time.
    ///
    /// # Panics
    ///
    /// Panics if the components do not form a valid date.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
                .single()
                .expect("valid fixed clock time"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
