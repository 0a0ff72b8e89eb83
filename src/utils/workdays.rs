//! Business day arithmetic.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Returns the business day preceding `date`, at the same time of day.
///
/// Monday, Saturday and Sunday all go back to the previous Friday. Public
/// holidays are not taken into account.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use kanban_report::utils::previous_workday;
///
/// let monday = Utc.with_ymd_and_hms(2021, 3, 15, 15, 15, 15).unwrap();
/// let friday = Utc.with_ymd_and_hms(2021, 3, 12, 15, 15, 15).unwrap();
/// assert_eq!(previous_workday(monday), friday);
/// ```
#[must_use]
pub fn previous_workday(date: DateTime<Utc>) -> DateTime<Utc> {
    let days_back = match date.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    date - Duration::days(days_back)
}
