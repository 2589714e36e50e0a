mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use timepicker::config::{
    PickerConfig, load_picker_config, parse_time_of_day, validate_interval, validate_span_hours,
    warn_if_inverted,
};
use timepicker::entry::{ClockConvention, TimeEntrySession};
use timepicker::replay::{load_script, run_script};
use timepicker::time_provider::select_provider;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliClock {
    #[value(name = "12h")]
    Hour12,
    #[value(name = "24h")]
    Hour24,
}

impl From<CliClock> for ClockConvention {
    fn from(value: CliClock) -> Self {
        match value {
            CliClock::Hour12 => ClockConvention::Hour12,
            CliClock::Hour24 => ClockConvention::Hour24,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "timepicker",
    version,
    about = "Keyboard-first time input with masking and range-aware suggestions"
)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    clock: Option<CliClock>,

    #[arg(long, value_parser = parse_time_of_day)]
    min_time: Option<NaiveTime>,

    #[arg(long, value_parser = parse_time_of_day)]
    max_time: Option<NaiveTime>,

    #[arg(long = "interval", visible_alias = "interval-minutes")]
    interval_minutes: Option<u32>,

    #[arg(long)]
    max_span_hours: Option<u32>,

    #[arg(long, value_parser = parse_time_of_day)]
    value: Option<NaiveTime>,

    #[arg(long, value_parser = parse_time_of_day)]
    now: Option<NaiveTime>,

    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Stdout carries replay transcripts, so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let clock = select_provider(cli.now);
    let clock_label = clock.label();
    let today = clock.today();
    let mut session = TimeEntrySession::new(config.entry, clock);
    session.set_value(config.initial_value(today));

    if let Some(path) = &cli.script {
        let script =
            load_script(path).with_context(|| format!("failed to load {}", path.display()))?;
        println!("Time entry replay");
        println!("Clock convention: {}", config.entry.convention.label());
        println!("Time source: {clock_label}");
        print!("{}", run_script(&mut session, &script)?);
        return Ok(());
    }

    ui::app::run_gui(session)
}

fn resolve_config(cli: &Cli) -> Result<PickerConfig> {
    let mut config = match &cli.config {
        Some(path) => load_picker_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => PickerConfig::default(),
    };

    if let Some(clock) = cli.clock {
        config.entry.convention = clock.into();
    }
    if cli.min_time.is_some() {
        config.entry.min_time = cli.min_time;
    }
    if cli.max_time.is_some() {
        config.entry.max_time = cli.max_time;
    }
    if let Some(interval) = cli.interval_minutes {
        validate_interval(interval).context("invalid --interval")?;
        config.entry.options.interval_minutes = interval;
    }
    if let Some(hours) = cli.max_span_hours {
        validate_span_hours(hours).context("invalid --max-span-hours")?;
        config.entry.options.max_span_hours = Some(hours);
    }
    if cli.value.is_some() {
        config.value = cli.value;
    }
    warn_if_inverted(config.entry.min_time, config.entry.max_time);
    Ok(config)
}
