/// Utility functions for reading loosely-typed store payloads
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Extract a flight number: a positive integer, possibly stored as an
/// integral float (`12.0`) or a numeric string
pub fn flight_number(v: &Value) -> Option<u64> {
    let n = if let Some(n) = v.as_u64() {
        n
    } else if let Some(s) = v.as_str() {
        s.trim().parse::<u64>().ok()?
    } else {
        let f = v.as_f64()?;
        if f.fract() != 0.0 || f < 1.0 || f > u64::MAX as f64 {
            return None;
        }
        f as u64
    };
    (n >= 1).then_some(n)
}

/// Parse a timestamp string.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`
/// (read as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Read a timestamp from a JSON string or unix seconds
pub fn timestamp(v: &Value) -> Option<DateTime<Utc>> {
    if let Some(s) = v.as_str() {
        return parse_timestamp(s);
    }
    if let Some(n) = v.as_i64() {
        return Utc.timestamp_opt(n, 0).single();
    }
    None
}
