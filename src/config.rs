use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::entry::{ClockConvention, EntrySettings, SuggestionOptions};

const HOURS_PER_DAY: u32 = 24;
const MINUTES_PER_DAY: u32 = HOURS_PER_DAY * 60;

#[derive(Debug, Clone, Default)]
pub struct PickerConfig {
    pub entry: EntrySettings,
    pub value: Option<NaiveTime>,
}

impl PickerConfig {
    pub fn initial_value(&self, day: NaiveDate) -> Option<NaiveDateTime> {
        self.value.map(|time| day.and_time(time))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeTokenError {
    #[error("empty time token")]
    Empty,
    #[error("invalid time '{0}', expected HH:MM, HH:MM:SS or hh:mm AM/PM")]
    Unrecognised(String),
}

/// Parses a time of day written either as 24-hour `HH:MM[:SS]` or as
/// `hh:mm AM`/`hh:mm PM`.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, TimeTokenError> {
    let token = input.trim();
    if token.is_empty() {
        return Err(TimeTokenError::Empty);
    }
    let upper = token.to_uppercase();
    NaiveTime::parse_from_str(&upper, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%H:%M"))
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M %p"))
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M%p"))
        .map_err(|_| TimeTokenError::Unrecognised(token.to_string()))
}

pub fn load_picker_config(path: &Path) -> Result<PickerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read picker config {}", path.display()))?;
    parse_picker_config_text(&content)
}

pub fn parse_picker_config_text(content: &str) -> Result<PickerConfig> {
    let raw = serde_json::from_str::<PickerConfigFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != 1 {
        bail!(
            "unsupported picker config version {}; expected version 1",
            raw.version
        );
    }
    validate_interval(raw.interval_minutes)?;
    if let Some(hours) = raw.max_span_hours {
        validate_span_hours(hours)?;
    }

    let min_time = parse_optional_field("min_time", raw.min_time.as_deref())?;
    let max_time = parse_optional_field("max_time", raw.max_time.as_deref())?;
    let value = parse_optional_field("value", raw.value.as_deref())?;
    warn_if_inverted(min_time, max_time);

    Ok(PickerConfig {
        entry: EntrySettings {
            convention: raw.clock,
            min_time,
            max_time,
            options: SuggestionOptions {
                interval_minutes: raw.interval_minutes,
                max_span_hours: raw.max_span_hours,
            },
        },
        value,
    })
}

pub fn validate_interval(interval_minutes: u32) -> Result<()> {
    if interval_minutes == 0 || interval_minutes > MINUTES_PER_DAY {
        bail!("interval_minutes must be between 1 and {MINUTES_PER_DAY}, got {interval_minutes}");
    }
    Ok(())
}

pub fn validate_span_hours(max_span_hours: u32) -> Result<()> {
    if max_span_hours > HOURS_PER_DAY {
        bail!("max_span_hours must be at most {HOURS_PER_DAY}, got {max_span_hours}");
    }
    Ok(())
}

/// A minimum after the maximum is left to the caller; it only means nothing
/// will ever be suggested or accepted.
pub fn warn_if_inverted(min_time: Option<NaiveTime>, max_time: Option<NaiveTime>) {
    if let (Some(min), Some(max)) = (min_time, max_time)
        && min > max
    {
        warn!(%min, %max, "min_time is after max_time; no time can be selected");
    }
}

fn parse_optional_field(field: &str, input: Option<&str>) -> Result<Option<NaiveTime>> {
    input
        .map(|token| parse_time_of_day(token).with_context(|| format!("invalid {field}")))
        .transpose()
}

#[derive(Debug, Deserialize)]
struct PickerConfigFile {
    version: u32,
    #[serde(default)]
    clock: ClockConvention,
    #[serde(default)]
    min_time: Option<String>,
    #[serde(default)]
    max_time: Option<String>,
    #[serde(default = "default_interval_minutes")]
    interval_minutes: u32,
    #[serde(default)]
    max_span_hours: Option<u32>,
    #[serde(default)]
    value: Option<String>,
}

fn default_interval_minutes() -> u32 {
    crate::entry::suggestions::DEFAULT_INTERVAL_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let json = r#"
{
  "version": 1,
  "clock": "24h",
  "min_time": "10:00",
  "max_time": "05:00 PM",
  "interval_minutes": 15,
  "max_span_hours": 4,
  "value": "09:30:00"
}
"#;
        let config = parse_picker_config_text(json).expect("valid config");
        assert_eq!(config.entry.convention, ClockConvention::Hour24);
        assert_eq!(config.entry.min_time, NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(config.entry.max_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(config.entry.options.interval_minutes, 15);
        assert_eq!(config.entry.options.max_span_hours, Some(4));
        assert_eq!(config.value, NaiveTime::from_hms_opt(9, 30, 0));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = parse_picker_config_text(r#"{ "version": 1 }"#).expect("valid config");
        assert_eq!(config.entry, EntrySettings::default());
        assert_eq!(config.entry.options.interval_minutes, 30);
        assert_eq!(config.value, None);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = parse_picker_config_text(r#"{ "version": 2 }"#).expect_err("version 2");
        assert!(err.to_string().contains("unsupported picker config version"));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = parse_picker_config_text(r#"{ "version": 1, "interval_minutes": 0 }"#)
            .expect_err("zero interval");
        assert!(err.to_string().contains("interval_minutes"));
    }

    #[test]
    fn rejects_span_longer_than_a_day() {
        let err = parse_picker_config_text(r#"{ "version": 1, "max_span_hours": 4294967295 }"#)
            .expect_err("oversized span");
        assert!(err.to_string().contains("max_span_hours must be at most 24"));

        let config = parse_picker_config_text(r#"{ "version": 1, "max_span_hours": 24 }"#)
            .expect("day-long span");
        assert_eq!(config.entry.options.max_span_hours, Some(24));
    }

    #[test]
    fn rejects_unparseable_time_naming_the_field() {
        let err = parse_picker_config_text(r#"{ "version": 1, "min_time": "noonish" }"#)
            .expect_err("bad time");
        assert!(err.to_string().contains("invalid min_time"));
        assert!(format!("{err:#}").contains("noonish"));
    }

    #[test]
    fn rejects_unknown_clock() {
        let err = parse_picker_config_text(r#"{ "version": 1, "clock": "36h" }"#)
            .expect_err("bad clock");
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn inverted_range_still_loads() {
        let json = r#"{ "version": 1, "min_time": "17:00", "max_time": "10:00" }"#;
        let config = parse_picker_config_text(json).expect("inverted range is allowed");
        assert!(config.entry.min_time > config.entry.max_time);
    }

    #[test]
    fn time_tokens_accept_both_conventions() {
        let expected = NaiveTime::from_hms_opt(21, 15, 0);
        assert_eq!(parse_time_of_day("21:15").ok(), expected);
        assert_eq!(parse_time_of_day("09:15 pm").ok(), expected);
        assert_eq!(parse_time_of_day("9:15PM").ok(), expected);
        assert_eq!(parse_time_of_day(" "), Err(TimeTokenError::Empty));
        assert!(matches!(
            parse_time_of_day("25:00"),
            Err(TimeTokenError::Unrecognised(_))
        ));
    }
}
