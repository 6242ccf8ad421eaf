//! Time period and time range grammars.

use super::macros::parse_user_macro;
use chrono::{NaiveDate, NaiveTime};

/// Parse a list of periods such as `1-5,09:00-18:00;6-7,10:00-16:00`.
///
/// Each period names a weekday or weekday range (1 = Monday) and a time
/// span within one day; the span must not be empty and may end at `24:00`.
/// With `user_macros` set, a whole period may be a user macro.
pub fn is_time_periods(text: &str, user_macros: bool) -> bool {
    !text.is_empty()
        && text.split(';').all(|period| {
            is_time_period(period)
                || (user_macros && parse_user_macro(period).is_some_and(|m| m.len == period.len()))
        })
}

fn is_time_period(period: &str) -> bool {
    let Some((days, span)) = period.split_once(',') else {
        return false;
    };

    let (first_day, last_day) = match days.split_once('-') {
        Some((first, last)) => (weekday(first), weekday(last)),
        None => (weekday(days), weekday(days)),
    };
    let (Some(first_day), Some(last_day)) = (first_day, last_day) else {
        return false;
    };
    if first_day > last_day {
        return false;
    }

    let Some((start, end)) = span.split_once('-') else {
        return false;
    };
    match (minute_of_day(start), minute_of_day(end)) {
        (Some(start), Some(end)) => start < end,
        _ => false,
    }
}

fn weekday(text: &str) -> Option<u8> {
    match text.as_bytes() {
        [d @ b'1'..=b'7'] => Some(d - b'0'),
        _ => None,
    }
}

/// `h:mm` or `hh:mm` up to and including `24:00`.
fn minute_of_day(text: &str) -> Option<u32> {
    let (hours, minutes) = text.split_once(':')?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    let total = hours * 60 + minutes;

    (minutes < 60 && total <= 24 * 60).then_some(total)
}

fn is_range_unit(b: u8) -> bool {
    matches!(b, b's' | b'm' | b'h' | b'd' | b'w' | b'M' | b'y')
}

/// Parse a time range boundary: either relative to now (`now`, `now-1d`,
/// `now/w`, `now-1M/M`) or an absolute date and time, possibly truncated
/// (`2024`, `2024-02`, `2024-02-29 13:05`).
pub fn is_range_time(text: &str) -> bool {
    is_relative_time(text) || is_absolute_time(text)
}

fn is_relative_time(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("now") else {
        return false;
    };
    let bytes = rest.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'+' | b'-' => {
                let digits = bytes[pos + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                if digits == 0 {
                    return false;
                }
                pos += 1 + digits;
                if bytes.get(pos).copied().is_some_and(is_range_unit) {
                    pos += 1;
                }
            }
            b'/' => {
                if !bytes.get(pos + 1).copied().is_some_and(is_range_unit) {
                    return false;
                }
                pos += 2;
            }
            _ => return false,
        }
    }

    true
}

fn is_absolute_time(text: &str) -> bool {
    let (date, time) = match text.split_once(' ') {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };

    let date_parts: Vec<&str> = date.split('-').collect();
    let widths = [4, 2, 2];
    if date_parts.len() > widths.len()
        || date_parts
            .iter()
            .zip(widths)
            .any(|(part, width)| part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    let year: i32 = date_parts[0].parse().unwrap_or(0);
    let month: u32 = date_parts.get(1).map_or(Ok(1), |m| m.parse()).unwrap_or(0);
    let day: u32 = date_parts.get(2).map_or(Ok(1), |d| d.parse()).unwrap_or(0);
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return false;
    }

    let Some(time) = time else {
        return true;
    };
    // a time of day needs a full date
    if date_parts.len() != 3 {
        return false;
    }

    let time_parts: Vec<&str> = time.split(':').collect();
    if time_parts.len() > 3
        || time_parts
            .iter()
            .any(|part| part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    let field = |index: usize| -> u32 {
        time_parts
            .get(index)
            .map_or(Ok(0), |part| part.parse())
            .unwrap_or(u32::MAX)
    };
    NaiveTime::from_hms_opt(field(0), field(1), field(2)).is_some()
}
