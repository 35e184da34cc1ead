use crate::error::StatsError;
use chrono::{DateTime, Utc};

const ONE_MINUTE: u64 = 60;
const ONE_HOUR: u64 = ONE_MINUTE * 60;
const ONE_DAY: u64 = ONE_HOUR * 24;

/// Parses a resolution such as `30m` or `7d` into seconds.
///
/// Grammar: one or more ASCII digits followed by `s`, `m`, `h` or `d`.
pub fn parse_resolution(value: &str) -> Result<u64, StatsError> {
    let invalid = || StatsError::InvalidResolution(value.to_string());

    let mut chars = value.chars();
    let unit = match chars.next_back() {
        Some('s') => 1,
        Some('m') => ONE_MINUTE,
        Some('h') => ONE_HOUR,
        Some('d') => ONE_DAY,
        _ => return Err(invalid()),
    };

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(unit))
        .ok_or_else(invalid)
}

/// Parses a UNIX timestamp in seconds, fractional part included.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, StatsError> {
    let invalid = || StatsError::InvalidTimestamp {
        field,
        value: value.to_string(),
    };

    let secs: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !secs.is_finite() {
        return Err(invalid());
    }

    let whole = secs.floor();
    let mut nanos = ((secs - whole) * 1e9).round() as u32;
    let mut whole = whole as i64;
    if nanos >= 1_000_000_000 {
        whole = whole.checked_add(1).ok_or_else(invalid)?;
        nanos = 0;
    }

    DateTime::from_timestamp(whole, nanos).ok_or_else(invalid)
}
