use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Kline intervals as the exchange names them (`1m`, `4h`, `1w`, `1M`).
pub fn interval_to_millis(interval: &str) -> Option<u64> {
    let unit = interval.chars().last()?;
    let value_str = &interval[..interval.len() - unit.len_utf8()];
    let value: u64 = value_str.parse().ok()?;
    if value == 0 {
        return None;
    }
    let multiplier = match unit {
        's' => 1_000,
        'm' => 60_000,
        'h' => 3_600_000,
        'd' => 86_400_000,
        'w' => 7 * 86_400_000,
        'M' => 30 * 86_400_000,
        _ => return None,
    };
    Some(value.saturating_mul(multiplier))
}

/// `2021-03-02 00:00:00`, with fractional seconds only when non-zero.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}
