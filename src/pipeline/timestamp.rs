//! Conversions of GPX `<time>` values into spreadsheet day serials and
//! local wall-clock strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::TimestampError;

/// 1899-12-30T00:00:00Z as Unix seconds. Day zero of spreadsheet serials.
pub const SPREADSHEET_EPOCH_UNIX: i64 = -2_209_161_600;

pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

pub fn spreadsheet_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(SPREADSHEET_EPOCH_UNIX, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parses an ISO-8601 instant. A `Z` or numeric offset is honoured; a bare
/// date-time without offset is taken as UTC.
pub fn parse_instant(timestamp: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError::Invalid(timestamp.to_string()))
}

/// Days, fractional part included, from `epoch` to `timestamp`.
/// No leap-second correction. `None` in, `None` out.
pub fn to_spreadsheet_serial(
    timestamp: Option<&str>,
    epoch: DateTime<Utc>,
) -> Result<Option<f64>, TimestampError> {
    let Some(timestamp) = timestamp else {
        return Ok(None);
    };
    let delta = parse_instant(timestamp)?.signed_duration_since(epoch);
    let micros = delta
        .num_microseconds()
        .unwrap_or_else(|| delta.num_seconds().saturating_mul(1_000_000));
    Ok(Some(micros as f64 / MICROS_PER_DAY))
}

/// Wall-clock time of `timestamp` in `zone`, formatted `YYYY-MM-DD HH:MM:SS`.
pub fn to_local_time(timestamp: Option<&str>, zone: Tz) -> Result<Option<String>, TimestampError> {
    let Some(timestamp) = timestamp else {
        return Ok(None);
    };
    let local = parse_instant(timestamp)?.with_timezone(&zone);
    Ok(Some(local.format(LOCAL_TIME_FORMAT).to_string()))
}
