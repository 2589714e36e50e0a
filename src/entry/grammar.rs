use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::entry::{ClockConvention, TimeRange};

static TWELVE_HOUR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0?[1-9]|1[0-2]):([0-5][0-9]) ([AP])M$").expect("12h regex is valid")
});

static TWENTY_FOUR_HOUR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("24h regex is valid")
});

// Forgiving shape of text mid-typing: hour digits, optional minute digits,
// optional meridiem letter.
static PARTIAL_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})(?::?([0-9]{1,2}))?\s*([AP])?M?$").expect("partial regex is valid")
});

fn grammar(convention: ClockConvention) -> &'static Regex {
    match convention {
        ClockConvention::Hour12 => &TWELVE_HOUR_REGEX,
        ClockConvention::Hour24 => &TWENTY_FOUR_HOUR_REGEX,
    }
}

/// Grammar check only; the meridiem must be uppercase as produced by masking.
pub fn is_well_formed(text: &str, convention: ClockConvention) -> bool {
    grammar(convention).is_match(text)
}

pub fn parse_time_text(
    text: &str,
    convention: ClockConvention,
    day: NaiveDate,
) -> Option<NaiveDateTime> {
    let captures = grammar(convention).captures(text)?;
    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(2)?.as_str().parse().ok()?;
    let hour = match convention {
        ClockConvention::Hour12 => to_24_hour(hour, captures.get(3)?.as_str() == "P"),
        ClockConvention::Hour24 => hour,
    };
    day.and_hms_opt(hour, minute, 0)
}

/// Reads whatever the user has typed so far as a time on `day`.
///
/// Used to anchor suggestions while the text is still incomplete: `"09"` reads
/// as 09:00, `"09:4"` as 09:04 and `"09:45 P"` as 21:45. Without a meridiem a
/// twelve-hour value is taken at face value.
pub fn parse_partial_time(
    text: &str,
    convention: ClockConvention,
    day: NaiveDate,
) -> Option<NaiveDateTime> {
    let upper = text.trim().to_uppercase();
    let captures = PARTIAL_TIME_REGEX.captures(&upper)?;
    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match captures.get(2) {
        Some(minute) => minute.as_str().parse().ok()?,
        None => 0,
    };
    if hour > convention.hour_ceiling() || minute > 59 {
        return None;
    }
    let hour = match (convention, captures.get(3)) {
        (ClockConvention::Hour12, Some(meridiem)) => {
            if hour == 0 {
                return None;
            }
            to_24_hour(hour, meridiem.as_str() == "P")
        }
        (ClockConvention::Hour12, None) | (ClockConvention::Hour24, _) => hour,
    };
    day.and_hms_opt(hour, minute, 0)
}

pub fn is_valid_and_in_range(
    text: &str,
    convention: ClockConvention,
    range: &TimeRange,
    day: NaiveDate,
) -> bool {
    parse_time_text(text, convention, day).is_some_and(|value| range.contains(value))
}

fn to_24_hour(hour12: u32, is_pm: bool) -> u32 {
    let hour = hour12 % 12;
    if is_pm { hour + 12 } else { hour }
}
