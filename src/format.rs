//! Display helpers for file sizes and timestamps.

use chrono::DateTime;

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count as a human-readable string.
///
/// The unit is the largest of `Bytes`, `KB`, `MB`, `GB`, `TB` (powers of
/// 1024) that keeps the value at or above 1; sizes past the last unit stay
/// in `TB`. The value is rounded to two decimals without trailing zeros.
///
/// # Examples
/// ```
/// use megafm::format::format_size;
///
/// assert_eq!(format_size(0), "0 Bytes");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut threshold = 1024u64;
    while unit < UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Format a unix timestamp (seconds, UTC) for file listings.
///
/// Out-of-range values render as `-`.
pub fn format_timestamp(seconds: i64) -> String {
    match DateTime::from_timestamp(seconds, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_examples() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(1_073_741_824), "1 GB");
        assert_eq!(format_size(1_099_511_627_776), "1 TB");
    }

    #[test]
    fn test_format_size_rounding() {
        // 1234567 / 1048576 = 1.1773...
        assert_eq!(format_size(1_234_567), "1.18 MB");
        assert_eq!(format_size(1025), "1 KB");
    }

    #[test]
    fn test_format_size_clamps_to_tb() {
        assert_eq!(format_size(1024 * 1_099_511_627_776), "1024 TB");
        assert!(format_size(u64::MAX).ends_with(" TB"));
    }

    #[test]
    fn test_unit_selection_is_monotonic() {
        let rank = |s: &str| {
            let unit = s.rsplit(' ').next().unwrap();
            UNITS.iter().position(|u| *u == unit).unwrap()
        };
        let mut last = 0;
        let mut b = 1u64;
        while b < (1u64 << 50) {
            let formatted = format_size(b);
            let r = rank(&formatted);
            assert!(r >= last, "{} went down a unit", b);
            if b >= 1024 {
                let value: f64 = formatted.split(' ').next().unwrap().parse().unwrap();
                assert!(value >= 1.0, "{} displayed below 1", b);
            }
            last = r;
            b = b * 3 / 2 + 1;
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13");
        assert_eq!(format_timestamp(i64::MAX), "-");
    }
}
