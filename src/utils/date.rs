//! UTC calendar helpers without timezone dependencies.
//!
//! Only the year is needed (footer copyright line), so this converts a
//! unix timestamp into a civil date and nothing more.

use std::time::{SystemTime, UNIX_EPOCH};

/// Calendar date in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateUtc {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl DateUtc {
    /// Convert seconds since the unix epoch into a civil date.
    ///
    /// Uses the days-from-civil inverse (proleptic Gregorian calendar).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(86_400);
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400 + if month <= 2 { 1 } else { 0 }) as i32;
        Self { year, month, day }
    }

    /// Today's date according to the system clock.
    pub fn today() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self::from_unix(secs)
    }
}

/// Current year, for copyright lines.
pub fn current_year() -> i32 {
    DateUtc::today().year
}
