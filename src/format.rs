//! Formatting of remaining time into display units.
//!
//! Both formatters are pure functions of the remaining value, so a redraw can
//! always be re-derived without touching timer state. An empty result is the
//! completion signal consumed by the display layer: no digits are written for
//! an expired countdown, the completion path runs instead.

/// Zero-pads a unit to at least two digits.
///
/// Values that already need more room (hour counts past 99) keep their full
/// width, matching `format!("{:02}")` semantics.
fn pad2(n: i64) -> String {
    format!("{:02}", n)
}

/// Formats remaining seconds as `[hours, minutes, seconds]`, most-significant
/// first, each zero-padded to two digits.
///
/// Returns an empty vector when nothing remains — the completion signal.
/// Seconds are truncated, not rounded; a countdown at 59.9s reads `59`.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::format::format_relative;
///
/// assert_eq!(format_relative(3_661), vec!["01", "01", "01"]);
/// assert_eq!(format_relative(5), vec!["00", "00", "05"]);
/// assert!(format_relative(0).is_empty());
/// ```
pub fn format_relative(remaining_secs: i64) -> Vec<String> {
    let mut left = remaining_secs.max(0);

    let hours = left / 3_600;
    left -= hours * 3_600;
    let minutes = left / 60;
    let seconds = left % 60;

    if hours == 0 && minutes == 0 && seconds == 0 {
        return Vec::new();
    }
    vec![pad2(hours), pad2(minutes), pad2(seconds)]
}

/// Formats remaining milliseconds as `[days, hours, minutes]` for the
/// absolute-deadline mode: days unpadded, hours and minutes two-digit.
///
/// Minutes are *rounded*, and the round carries upward: 60 rounded minutes
/// become an extra hour, 24 carried hours become an extra day. This asymmetry
/// with [`format_relative`] (which truncates) is deliberate and preserved
/// from the original display behavior.
///
/// Returns an empty vector only when the deadline has actually been reached;
/// a sub-minute remainder that rounds down to zero still renders as
/// `["0", "00", "00"]` rather than signalling completion early.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::format::format_absolute;
///
/// // 1 day, 1 hour, 61 seconds: the 61s round up to a whole minute.
/// assert_eq!(format_absolute(90_061_000), vec!["1", "01", "01"]);
/// assert!(format_absolute(0).is_empty());
/// ```
pub fn format_absolute(remaining_ms: i64) -> Vec<String> {
    let t = remaining_ms.max(0);
    if t == 0 {
        return Vec::new();
    }

    const DAY_MS: i64 = 24 * 60 * 60 * 1_000;
    const HOUR_MS: i64 = 60 * 60 * 1_000;

    let mut days = t / DAY_MS;
    let mut hours = (t - days * DAY_MS) / HOUR_MS;
    let mut minutes =
        ((t - days * DAY_MS - hours * HOUR_MS) as f64 / 60_000.0).round() as i64;

    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }
    if hours == 24 {
        days += 1;
        hours = 0;
    }

    vec![days.to_string(), pad2(hours), pad2(minutes)]
}
