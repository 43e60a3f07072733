//! Clock-time parsing and interval arithmetic for section meeting times.
//!
//! The catalog stores meeting times as `"h:mm am"` / `"h:mm pm"` strings
//! (lowercase meridiem, single space). Empty strings and the literal
//! `"TBA"` mean the time is unknown.

/// Parse a catalog time string into a decimal hour in `[0, 24)`.
///
/// `"12:00 am"` maps to `0.0`, `"12:00 pm"` to `12.0`, `"1:30 pm"` to
/// `13.5`. Returns `None` for empty strings, `"TBA"`, or anything that
/// does not match the expected shape.
pub fn parse_clock_time(time_str: &str) -> Option<f64> {
    if time_str.is_empty() || time_str == "TBA" {
        return None;
    }

    let (hour_part, rest) = time_str.split_once(':')?;
    let hour: u32 = hour_part.parse().ok()?;

    let (minute_part, meridiem) = rest.split_once(' ')?;
    let minute: u32 = minute_part.parse().ok()?;

    let hour = match meridiem {
        "pm" if hour < 12 => hour + 12,
        "am" if hour == 12 => 0,
        "am" | "pm" => hour,
        _ => return None,
    };

    Some(hour as f64 + minute as f64 / 60.0)
}

/// Minutes from `start_time` to `end_time`, treating an end before the
/// start as an overnight meeting. `None` if either endpoint is unknown.
pub fn minutes_between(start_time: &str, end_time: &str) -> Option<i32> {
    let start = parse_clock_time(start_time)?;
    let mut end = parse_clock_time(end_time)?;
    if end < start {
        end += 24.0;
    }
    Some(((end - start) * 60.0) as i32)
}

/// Whether two meeting-time intervals overlap.
///
/// Intervals with an end before their start are extended past midnight.
/// Unknown endpoints never overlap anything.
pub fn times_overlap(start1: &str, end1: &str, start2: &str, end2: &str) -> bool {
    let (Some(s1), Some(e1), Some(s2), Some(e2)) = (
        parse_clock_time(start1),
        parse_clock_time(end1),
        parse_clock_time(start2),
        parse_clock_time(end2),
    ) else {
        return false;
    };

    let e1 = if e1 < s1 { e1 + 24.0 } else { e1 };
    let e2 = if e2 < s2 { e2 + 24.0 } else { e2 };

    s1 < e2 && s2 < e1
}
