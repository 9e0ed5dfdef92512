use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::TripGraphError;

/// timestamp format written to the staging file. no offset, no sub-second part.
pub const STAGING_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// naive formats accepted from the source file. `%.f` also matches an
/// absent fractional part.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// parses a trip timestamp. zoned inputs keep their wall-clock time
/// and drop the offset.
pub fn parse_trip_datetime(value: &str) -> Result<NaiveDateTime, TripGraphError> {
    let trimmed = value.trim();
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok());
    if let Some(datetime) = naive {
        return Ok(datetime);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.naive_local());
    }
    let zoned = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(trimmed, fmt).ok());
    if let Some(datetime) = zoned {
        return Ok(datetime.naive_local());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TripGraphError::TransformError(format!("invalid timestamp '{value}'")))
}

/// writes a datetime in [`STAGING_DATETIME_FORMAT`]. sub-second precision is truncated.
pub fn format_staging_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(STAGING_DATETIME_FORMAT).to_string()
}

pub fn normalize_timestamp(value: &str) -> Result<String, TripGraphError> {
    parse_trip_datetime(value).map(|dt| format_staging_datetime(&dt))
}
