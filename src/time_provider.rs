use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the wall-clock "now" used for suggestion anchors, placeholders
/// and for placing range bounds on the current day.
pub trait TimeProvider {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn label(&self) -> &'static str;
}

pub struct LocalTimeProvider;

impl TimeProvider for LocalTimeProvider {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn label(&self) -> &'static str {
        "LOCAL_CLOCK"
    }
}

/// Always reports the same moment; used by headless replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider {
    now: NaiveDateTime,
}

impl FixedTimeProvider {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Pins the clock to `time` on the current local date.
    pub fn today_at(time: NaiveTime) -> Self {
        Self::new(Local::now().date_naive().and_time(time))
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn label(&self) -> &'static str {
        "PINNED_CLOCK"
    }
}

pub fn select_provider(pinned: Option<NaiveTime>) -> Box<dyn TimeProvider> {
    match pinned {
        Some(time) => Box::new(FixedTimeProvider::today_at(time)),
        None => Box::new(LocalTimeProvider),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_provider_reports_pinned_moment() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 14)
            .and_then(|day| day.and_hms_opt(8, 15, 0))
            .expect("valid datetime");
        let provider = FixedTimeProvider::new(now);
        assert_eq!(provider.now(), now);
        assert_eq!(provider.today(), now.date());
        assert_eq!(provider.label(), "PINNED_CLOCK");
    }

    #[test]
    fn pinned_selection_uses_local_date() {
        let time = NaiveTime::from_hms_opt(8, 0, 0).expect("valid time");
        let provider = select_provider(Some(time));
        assert_eq!(provider.now().time(), time);
        assert_eq!(provider.today(), Local::now().date_naive());
        assert_eq!(select_provider(None).label(), "LOCAL_CLOCK");
    }
}
