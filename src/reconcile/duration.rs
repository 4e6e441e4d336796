//! Normalization of the dialer feed's time values.
//!
//! The upstream export writes talk/wait time as either a bare number of
//! seconds or a colon-delimited clock string ("H:M:S" or "M:S"), with no
//! format flag. The presence of ':' is the only discriminator.

/// Normalize a raw talk/wait value to whole seconds.
///
/// - `"H:M:S"` -> h*3600 + m*60 + s
/// - `"M:S"`   -> m*60 + s
/// - any other colon-segment count, or a non-numeric segment -> 0
/// - a bare number (float accepted, floored) -> that many seconds
/// - anything else -> 0
///
/// Never fails; inputs are assumed non-negative and negatives clamp to 0.
pub fn to_seconds(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    if raw.contains(':') {
        let parts: Vec<Option<i64>> = raw
            .split(':')
            .map(|p| p.trim().parse::<i64>().ok())
            .collect();

        let total = match parts.as_slice() {
            [Some(h), Some(m), Some(s)] => h * 3600 + m * 60 + s,
            [Some(m), Some(s)] => m * 60 + s,
            _ => 0,
        };
        return total.max(0);
    }

    raw.parse::<f64>()
        .map(|v| if v.is_finite() { v.floor() as i64 } else { 0 })
        .unwrap_or(0)
        .max(0)
}

/// `to_seconds` over a nullable column value.
pub fn to_seconds_opt(raw: Option<&str>) -> i64 {
    raw.map(to_seconds).unwrap_or(0)
}

/// Format a second count as "HH:MM:SS" for display payloads.
pub fn format_hms(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hrs = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hrs, mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_strings() {
        assert_eq!(to_seconds("1:02:03"), 3723);
        assert_eq!(to_seconds("5:30"), 330);
        assert_eq!(to_seconds("0:00:00"), 0);
        // Hours can exceed a day in weekly exports
        assert_eq!(to_seconds("25:00:00"), 90_000);
    }

    #[test]
    fn test_bare_numbers() {
        assert_eq!(to_seconds("120"), 120);
        assert_eq!(to_seconds("  120  "), 120);
        // Fractional seconds floor
        assert_eq!(to_seconds("120.9"), 120);
    }

    #[test]
    fn test_garbage_and_empty() {
        assert_eq!(to_seconds(""), 0);
        assert_eq!(to_seconds("   "), 0);
        assert_eq!(to_seconds("abc"), 0);
        assert_eq!(to_seconds("1:2:3:4"), 0);
        assert_eq!(to_seconds("1:xx:3"), 0);
        assert_eq!(to_seconds("-5"), 0);
        assert_eq!(to_seconds_opt(None), 0);
        assert_eq!(to_seconds_opt(Some("5:30")), 330);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(3723), "01:02:03");
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(-10), "00:00:00");
    }
}
