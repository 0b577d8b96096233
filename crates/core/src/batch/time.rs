//! Clock-time helpers for operator-entered times.
//!
//! Forms record times either as 24-hour `HH:MM` or as `h:mm AM/PM`. Phase
//! durations are differences between two such clock readings and wrap past
//! midnight.

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses a clock time into minutes after midnight.
///
/// Accepts `HH:MM` and `h:mm AM/PM` (meridiem case-insensitive). Returns
/// `None` for anything else.
pub fn parse_clock(time: &str) -> Option<u32> {
    let mut parts = time.split_whitespace();
    let clock = parts.next()?;
    let meridiem = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let (hours, minutes) = clock.split_once(':')?;
    let mut hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    match meridiem.map(str::to_ascii_uppercase).as_deref() {
        None if hours < 24 => {}
        Some("AM") if (1..=12).contains(&hours) => {
            if hours == 12 {
                hours = 0;
            }
        }
        Some("PM") if (1..=12).contains(&hours) => {
            if hours < 12 {
                hours += 12;
            }
        }
        _ => return None,
    }

    Some(hours * 60 + minutes)
}

/// Renders a minute count as `Xh Ym`.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Elapsed time from `start` to `end`, rendered `Xh Ym`.
///
/// An `end` earlier than `start` is taken to be on the next day. Empty or
/// unparseable input yields `0h 0m`.
///
/// # Example
///
/// ```
/// use aac_core::batch::time::time_difference;
///
/// assert_eq!(time_difference("12:10", "13:38"), "1h 28m");
/// assert_eq!(time_difference("11:30 PM", "1:05 AM"), "1h 35m");
/// ```
pub fn time_difference(start: &str, end: &str) -> String {
    match (parse_clock(start), parse_clock(end)) {
        (Some(start), Some(end)) => {
            format_duration((end + MINUTES_PER_DAY - start) % MINUTES_PER_DAY)
        }
        _ => format_duration(0),
    }
}
