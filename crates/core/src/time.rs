#![forbid(unsafe_code)]

use ::time::OffsetDateTime;
use ::time::format_description::well_known::Rfc3339;

const EPOCH_RFC3339: &str = "1970-01-01T00:00:00Z";

/// Milliseconds since the Unix epoch, clamped to `0..=i64::MAX`.
pub fn now_ms() -> i64 {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(ms.max(0)).unwrap_or(i64::MAX)
}

fn datetime_from_ms(ts_ms: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ts_ms) * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    datetime_from_ms(ts_ms)
        .format(&Rfc3339)
        .unwrap_or_else(|_| EPOCH_RFC3339.to_string())
}

/// `HH:MM:SS` wall-clock time in UTC, used by generated demo lines.
pub fn clock_hms(ts_ms: i64) -> String {
    let dt = datetime_from_ms(ts_ms);
    format!("{:02}:{:02}:{:02}", dt.hour(), dt.minute(), dt.second())
}
