use chrono::{Duration, NaiveDateTime, Timelike};

use crate::entry::{TimeRange, end_of_day, start_of_day, truncate_to_minute};

pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SuggestionOptions {
    pub interval_minutes: u32,
    pub max_span_hours: Option<u32>,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            max_span_hours: None,
        }
    }
}

/// Ascending, evenly spaced candidates between two inclusive bounds.
///
/// Cloning restarts the sequence from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct Suggestions {
    next: NaiveDateTime,
    upper: NaiveDateTime,
    step: Duration,
}

impl Suggestions {
    fn empty(at: NaiveDateTime) -> Self {
        Self {
            next: at,
            upper: at - Duration::minutes(1),
            step: Duration::minutes(1),
        }
    }
}

impl Iterator for Suggestions {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.upper {
            return None;
        }
        let current = self.next;
        self.next = current + self.step;
        Some(current)
    }
}

/// Rounds `anchor` up onto the interval grid, dropping seconds.
///
/// The grid restarts at the top of every hour: a minute already on a multiple
/// of the interval is kept, otherwise it moves up to the next multiple, and
/// anything that would land on or past minute 60 becomes the next full hour.
/// With the default 30 minute interval this rounds to `:30` or the next hour.
pub fn round_up_to_interval(anchor: NaiveDateTime, interval_minutes: u32) -> NaiveDateTime {
    let anchor = truncate_to_minute(anchor);
    if interval_minutes == 0 {
        return anchor;
    }
    let minute = anchor.minute();
    if minute % interval_minutes == 0 {
        return anchor;
    }
    let next_mark = minute.div_ceil(interval_minutes) * interval_minutes;
    let top_of_hour = anchor - Duration::minutes(i64::from(minute));
    if next_mark >= 60 {
        top_of_hour + Duration::hours(1)
    } else {
        top_of_hour + Duration::minutes(i64::from(next_mark))
    }
}

/// Enumerates selectable times on the anchor's day.
///
/// The first candidate is the latest of the start of the day, `range.min` and
/// the anchor rounded up onto the grid. The last candidate never passes the
/// end of the day, `range.max` or `max_span_hours` after the first (a span too
/// large to represent is no limit at all). An inverted
/// range or a zero interval yields an empty sequence.
pub fn generate_suggestions(
    anchor: NaiveDateTime,
    range: &TimeRange,
    options: SuggestionOptions,
) -> Suggestions {
    let day = anchor.date();
    if options.interval_minutes == 0 {
        return Suggestions::empty(start_of_day(day));
    }

    let day_start = start_of_day(day);
    let day_end = end_of_day(day);
    let lower = [
        Some(day_start),
        range.min.map(truncate_to_minute),
        Some(round_up_to_interval(anchor, options.interval_minutes)),
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(day_start);

    let span_end = options
        .max_span_hours
        .and_then(|hours| Duration::try_hours(i64::from(hours)))
        .and_then(|span| lower.checked_add_signed(span));
    let upper = [Some(day_end), range.max, span_end]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(day_end);

    Suggestions {
        next: lower,
        upper,
        step: Duration::minutes(i64::from(options.interval_minutes)),
    }
}
