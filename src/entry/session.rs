use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::entry::grammar::{
    is_valid_and_in_range, is_well_formed, parse_partial_time, parse_time_text,
};
use crate::entry::mask::mask_input;
use crate::entry::suggestions::{SuggestionOptions, generate_suggestions};
use crate::entry::{
    ClockConvention, TimeRange, format_optional_time, format_time, same_minute, truncate_to_minute,
};
use crate::time_provider::TimeProvider;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct EntrySettings {
    pub convention: ClockConvention,
    pub min_time: Option<NaiveTime>,
    pub max_time: Option<NaiveTime>,
    pub options: SuggestionOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEvent {
    RawInput(String),
    FocusAffordance,
    Blur,
    ClickOutside,
    PickSuggestion(NaiveDateTime),
}

/// Payload of the host's `onChange`: the value the session wants committed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ValueChange {
    pub value: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntryState {
    Empty,
    Typing,
    Committed,
}

/// How the rendering layer should paint the input.
///
/// Partial text is always `Neutral` so the field does not flash red mid-typing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Validity {
    Valid,
    Invalid,
    Neutral,
}

impl Validity {
    pub fn label(self) -> &'static str {
        match self {
            Validity::Valid => "valid",
            Validity::Invalid => "invalid",
            Validity::Neutral => "neutral",
        }
    }
}

impl EntryState {
    pub fn label(self) -> &'static str {
        match self {
            EntryState::Empty => "empty",
            EntryState::Typing => "typing",
            EntryState::Committed => "committed",
        }
    }
}

/// Draft text plus the last committed value of one time input.
///
/// The committed value belongs to the host: the session only proposes changes
/// through [`ValueChange`] and learns the outcome from [`set_value`].
///
/// [`set_value`]: TimeEntrySession::set_value
pub struct TimeEntrySession {
    settings: EntrySettings,
    draft: String,
    committed: Option<NaiveDateTime>,
    drop_down_open: bool,
    clock: Box<dyn TimeProvider>,
}

impl TimeEntrySession {
    pub fn new(settings: EntrySettings, clock: Box<dyn TimeProvider>) -> Self {
        Self {
            settings,
            draft: String::new(),
            committed: None,
            drop_down_open: false,
            clock,
        }
    }

    pub fn apply(&mut self, event: EntryEvent) -> Option<ValueChange> {
        match event {
            EntryEvent::RawInput(raw) => {
                self.on_raw_input(&raw);
                None
            }
            EntryEvent::FocusAffordance => {
                self.on_focus_affordance();
                None
            }
            EntryEvent::Blur => self.on_blur(),
            EntryEvent::ClickOutside => self.on_click_outside(),
            EntryEvent::PickSuggestion(candidate) => self.on_pick_suggestion(candidate),
        }
    }

    pub fn on_raw_input(&mut self, raw: &str) {
        match mask_input(raw, self.settings.convention) {
            Some(masked) => {
                self.draft = masked;
                self.drop_down_open = true;
            }
            None => debug!(raw, kept = %self.draft, "keystroke rejected by mask"),
        }
    }

    pub fn on_focus_affordance(&mut self) {
        self.drop_down_open = true;
    }

    pub fn on_pick_suggestion(&mut self, candidate: NaiveDateTime) -> Option<ValueChange> {
        self.drop_down_open = false;
        let picked = truncate_to_minute(candidate);
        if same_minute(Some(picked), self.committed) {
            self.draft = self.committed_text();
            return None;
        }
        self.propose(Some(picked))
    }

    pub fn on_blur(&mut self) -> Option<ValueChange> {
        self.drop_down_open = false;
        if self.draft.is_empty() {
            return if self.committed.is_some() {
                self.propose(None)
            } else {
                None
            };
        }

        let today = self.clock.today();
        if !is_valid_and_in_range(&self.draft, self.settings.convention, &self.range(), today) {
            debug!(draft = %self.draft, "reverting draft to committed value");
            self.draft = self.committed_text();
            return None;
        }

        let parsed = parse_time_text(&self.draft, self.settings.convention, today)?;
        if same_minute(Some(parsed), self.committed) {
            return None;
        }
        self.propose(Some(parsed))
    }

    pub fn on_click_outside(&mut self) -> Option<ValueChange> {
        self.on_blur()
    }

    /// Adopts a value coming from the host. Outside changes always overwrite
    /// the draft, including ones the session itself just proposed.
    pub fn set_value(&mut self, value: Option<NaiveDateTime>) {
        self.committed = value;
        self.draft = self.committed_text();
    }

    pub fn set_convention(&mut self, convention: ClockConvention) {
        self.settings.convention = convention;
        self.draft = self.committed_text();
    }

    pub fn set_range(&mut self, min_time: Option<NaiveTime>, max_time: Option<NaiveTime>) {
        self.settings.min_time = min_time;
        self.settings.max_time = max_time;
    }

    pub fn set_options(&mut self, options: SuggestionOptions) {
        self.settings.options = options;
    }

    pub fn display_text(&self) -> &str {
        &self.draft
    }

    pub fn value(&self) -> Option<NaiveDateTime> {
        self.committed
    }

    pub fn settings(&self) -> &EntrySettings {
        &self.settings
    }

    /// Day that range bounds and typed values are placed on.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::on(
            self.clock.today(),
            self.settings.min_time,
            self.settings.max_time,
        )
    }

    /// Candidates anchored on the draft when it reads as a time, otherwise on now.
    pub fn suggestions(&self) -> Vec<NaiveDateTime> {
        let now = self.clock.now();
        let anchor = parse_partial_time(&self.draft, self.settings.convention, now.date())
            .unwrap_or(now);
        generate_suggestions(anchor, &self.range(), self.settings.options).collect()
    }

    pub fn is_drop_down_visible(&self) -> bool {
        self.drop_down_open && !self.suggestions().is_empty()
    }

    pub fn validity(&self) -> Validity {
        let convention = self.settings.convention;
        if is_valid_and_in_range(&self.draft, convention, &self.range(), self.clock.today()) {
            Validity::Valid
        } else if is_well_formed(&self.draft, convention) {
            Validity::Invalid
        } else {
            Validity::Neutral
        }
    }

    pub fn state(&self) -> EntryState {
        if self.draft != self.committed_text() {
            EntryState::Typing
        } else if self.committed.is_some() {
            EntryState::Committed
        } else {
            EntryState::Empty
        }
    }

    pub fn placeholder(&self) -> String {
        format_time(self.clock.now(), self.settings.convention)
    }

    pub fn format(&self, value: NaiveDateTime) -> String {
        format_time(value, self.settings.convention)
    }

    fn committed_text(&self) -> String {
        format_optional_time(self.committed, self.settings.convention)
    }

    fn propose(&self, value: Option<NaiveDateTime>) -> Option<ValueChange> {
        info!(
            value = %format_optional_time(value, self.settings.convention),
            "committing time entry"
        );
        Some(ValueChange { value })
    }
}
