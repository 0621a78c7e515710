use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::constants::DAYS_PER_YEAR;

/// Default timezone for as-of dates.
/// Exports are produced by a US platform, so "today" is read in New York time.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to an as-of date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default valuation timezone.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

/// Fraction of a year between two dates on an actual/365 basis.
/// Negative when `end` precedes `start`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_YEAR
}
