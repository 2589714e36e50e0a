use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::config::parse_time_of_day;
use crate::entry::{ClockConvention, EntryEvent, TimeEntrySession, ValueChange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Event(EntryEvent),
    /// Index into the suggestion list as it stands when the step runs.
    PickIndex(usize),
    SetValue(Option<chrono::NaiveTime>),
    SetClock(ClockConvention),
}

#[derive(Debug, Clone)]
pub struct ScriptLine {
    pub number: usize,
    pub text: String,
    pub step: ScriptStep,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read event script {}", path.display()))?;
    parse_script(&content)
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let number = index + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let step = parse_step(text).with_context(|| format!("script line {number}"))?;
        lines.push(ScriptLine {
            number,
            text: text.to_string(),
            step,
        });
    }
    Ok(lines)
}

fn parse_step(text: &str) -> Result<ScriptStep> {
    let (command, argument) = match text.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (text, ""),
    };
    let step = match command {
        "type" => ScriptStep::Event(EntryEvent::RawInput(argument.to_string())),
        "focus" => ScriptStep::Event(EntryEvent::FocusAffordance),
        "blur" => ScriptStep::Event(EntryEvent::Blur),
        "click-outside" => ScriptStep::Event(EntryEvent::ClickOutside),
        "pick" => ScriptStep::PickIndex(
            argument
                .parse()
                .map_err(|_| anyhow!("pick expects a suggestion index, got '{argument}'"))?,
        ),
        "value" if argument.eq_ignore_ascii_case("none") => ScriptStep::SetValue(None),
        "value" => ScriptStep::SetValue(Some(parse_time_of_day(argument)?)),
        "clock" => ScriptStep::SetClock(match argument {
            "12h" => ClockConvention::Hour12,
            "24h" => ClockConvention::Hour24,
            other => bail!("clock expects 12h or 24h, got '{other}'"),
        }),
        other => bail!("unknown command '{other}'"),
    };
    Ok(step)
}

/// Runs every step against `session`, acting as a host that adopts each
/// proposed change, and returns the printed transcript.
pub fn run_script(session: &mut TimeEntrySession, script: &[ScriptLine]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Initial")?;
    describe(session, &mut out)?;

    for line in script {
        writeln!(out, "> {}", line.text)?;
        let change = match &line.step {
            ScriptStep::Event(event) => session.apply(event.clone()),
            ScriptStep::PickIndex(index) => {
                let suggestions = session.suggestions();
                let candidate = suggestions.get(*index).copied().ok_or_else(|| {
                    anyhow!(
                        "script line {}: pick {index} out of range ({} suggestions)",
                        line.number,
                        suggestions.len()
                    )
                })?;
                session.apply(EntryEvent::PickSuggestion(candidate))
            }
            ScriptStep::SetValue(time) => {
                let today = session.today();
                session.set_value(time.map(|time| today.and_time(time)));
                None
            }
            ScriptStep::SetClock(convention) => {
                session.set_convention(*convention);
                None
            }
        };
        if let Some(ValueChange { value }) = change {
            let text = value.map_or_else(|| "none".to_string(), |value| session.format(value));
            writeln!(out, "  change -> {text}")?;
            session.set_value(value);
        }
        describe(session, &mut out)?;
    }
    Ok(out)
}

fn describe(session: &TimeEntrySession, out: &mut String) -> Result<()> {
    writeln!(
        out,
        "  text=\"{}\" dropdown={} validity={} state={}",
        session.display_text(),
        if session.is_drop_down_visible() {
            "open"
        } else {
            "closed"
        },
        session.validity().label(),
        session.state().label(),
    )?;
    let suggestions = session.suggestions();
    match (suggestions.first(), suggestions.last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "  suggestions: {} .. {} ({})",
            session.format(*first),
            session.format(*last),
            suggestions.len()
        )?,
        _ => writeln!(out, "  suggestions: none")?,
    }
    Ok(())
}
