pub mod grammar;
pub mod mask;
pub mod session;
pub mod suggestions;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Deserialize;

pub use grammar::{is_valid_and_in_range, is_well_formed, parse_partial_time, parse_time_text};
pub use mask::mask_input;
pub use session::{EntryEvent, EntrySettings, EntryState, TimeEntrySession, Validity, ValueChange};
pub use suggestions::{SuggestionOptions, Suggestions, generate_suggestions, round_up_to_interval};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
pub enum ClockConvention {
    #[default]
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "24h")]
    Hour24,
}

impl ClockConvention {
    /// Highest hour a user can type under this convention.
    pub fn hour_ceiling(self) -> u32 {
        match self {
            ClockConvention::Hour12 => 12,
            ClockConvention::Hour24 => 23,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClockConvention::Hour12 => "12h",
            ClockConvention::Hour24 => "24h",
        }
    }

    fn chrono_format(self) -> &'static str {
        match self {
            ClockConvention::Hour12 => "%I:%M %p",
            ClockConvention::Hour24 => "%H:%M",
        }
    }
}

/// Inclusive bounds on a single day. A missing side is unbounded within the day.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct TimeRange {
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
}

impl TimeRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Places wall-clock bounds on `day`, dropping seconds.
    pub fn on(day: NaiveDate, min: Option<NaiveTime>, max: Option<NaiveTime>) -> Self {
        Self {
            min: min.map(|time| truncate_to_minute(day.and_time(time))),
            max: max.map(|time| truncate_to_minute(day.and_time(time))),
        }
    }

    pub fn contains(&self, value: NaiveDateTime) -> bool {
        let value = truncate_to_minute(value);
        let above_min = self.min.is_none_or(|min| value >= truncate_to_minute(min));
        let below_max = self.max.is_none_or(|max| value <= truncate_to_minute(max));
        above_min && below_max
    }
}

pub fn format_time(value: NaiveDateTime, convention: ClockConvention) -> String {
    value
        .format(convention.chrono_format())
        .to_string()
        .to_uppercase()
}

pub fn format_optional_time(value: Option<NaiveDateTime>, convention: ClockConvention) -> String {
    value
        .map(|value| format_time(value, convention))
        .unwrap_or_default()
}

pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(value)
}

pub fn same_minute(left: Option<NaiveDateTime>, right: Option<NaiveDateTime>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left), Some(right)) => truncate_to_minute(left) == truncate_to_minute(right),
        _ => false,
    }
}

pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(23, 59, 59).unwrap_or_else(|| start_of_day(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
    }

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        day().and_hms_opt(hour, minute, second).expect("valid time")
    }

    #[test]
    fn formats_both_conventions_uppercase() {
        assert_eq!(format_time(at(9, 45, 0), ClockConvention::Hour12), "09:45 AM");
        assert_eq!(format_time(at(21, 5, 0), ClockConvention::Hour12), "09:05 PM");
        assert_eq!(format_time(at(0, 30, 0), ClockConvention::Hour12), "12:30 AM");
        assert_eq!(format_time(at(21, 5, 0), ClockConvention::Hour24), "21:05");
        assert_eq!(format_optional_time(None, ClockConvention::Hour24), "");
    }

    #[test]
    fn range_compares_at_minute_granularity() {
        let range = TimeRange::on(
            day(),
            NaiveTime::from_hms_opt(10, 0, 45),
            NaiveTime::from_hms_opt(17, 0, 0),
        );
        assert_eq!(range.min, Some(at(10, 0, 0)));
        assert!(range.contains(at(10, 0, 0)));
        assert!(range.contains(at(17, 0, 59)));
        assert!(!range.contains(at(9, 59, 59)));
        assert!(!range.contains(at(17, 1, 0)));
        assert!(TimeRange::unbounded().contains(at(0, 0, 0)));
    }

    #[test]
    fn same_minute_ignores_seconds_and_matches_absence() {
        assert!(same_minute(Some(at(9, 30, 0)), Some(at(9, 30, 59))));
        assert!(!same_minute(Some(at(9, 30, 0)), Some(at(9, 31, 0))));
        assert!(same_minute(None, None));
        assert!(!same_minute(None, Some(at(9, 30, 0))));
    }

    #[test]
    fn config_tokens_deserialize_into_conventions() {
        let parsed: Vec<ClockConvention> =
            serde_json::from_str(r#"["12h", "24h"]"#).expect("valid conventions");
        assert_eq!(parsed, vec![ClockConvention::Hour12, ClockConvention::Hour24]);
        assert_eq!(ClockConvention::default().hour_ceiling(), 12);
    }
}
