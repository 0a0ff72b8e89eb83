use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ConfigError;

/// Parse a reference date given on the command line.
///
/// Accepts:
/// - RFC 3339 timestamps like "2020-02-20T20:00:00Z" or "2020-02-20T21:00:00+01:00"
/// - Timestamps without offset like "2020-02-20T20:00:00" or "2020-02-20 20:00:00" (UTC)
/// - Plain dates like "2020-02-20" (midnight UTC)
pub fn parse_reference_date(input: &str) -> Result<DateTime<Utc>, ConfigError> {
    let input = input.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(ConfigError::DateParseError {
        input: input.to_string(),
        message: "expected an RFC 3339 timestamp or a YYYY-MM-DD date".to_string(),
    })
}
