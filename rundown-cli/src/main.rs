//! Rundown CLI Tool
//!
//! Command-line interface for inspecting rundown timing: event status against
//! a clock, timeline lanes, countdowns and playback controls.

mod loader;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use rundown_core::time::{self, format_clock, format_duration};
use rundown_core::timeline::{hour_ruler, now_next, progress, visible_events};
use rundown_core::{
    derive_controls, place_events, resolve, ClockSample, ControlInput, EventId, FollowStatus, FollowTracker,
    LabelReserve, Playback, PlaybackSnapshot, ResolveContext, Rundown, ScheduleWindow, TimelineStatus, TimerPhase,
    TimerType, ViewConfig,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rundown")]
#[command(about = "Rundown timing - event status, timeline lanes and countdowns")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show rundown information
    Info {
        /// Rundown JSON file
        input: PathBuf,
    },

    /// Show the status of every event at a given time
    Status {
        /// Rundown JSON file
        input: PathBuf,

        #[command(flatten)]
        clock: ClockArgs,

        /// Leave finished events out
        #[arg(long)]
        hide_past: bool,
    },

    /// Lay out the rundown on a timeline
    Layout {
        /// Rundown JSON file
        input: PathBuf,

        /// Timeline width in pixels
        #[arg(long, default_value = "1000")]
        width: f64,

        /// Number of lanes before falling back to lane 0
        #[arg(long, default_value = "5")]
        max_depth: usize,

        /// Reserve room for titles at this many pixels per character
        #[arg(long)]
        label_px: Option<f64>,

        /// Round the schedule window out to whole hours
        #[arg(long)]
        hour_aligned: bool,

        /// Print placements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow one event's countdown over a series of clock samples
    Follow {
        /// Rundown JSON file
        input: PathBuf,

        /// ID of the event to follow
        #[arg(long)]
        id: String,

        #[command(flatten)]
        clock: ClockArgs,

        /// Further clock samples (hh:mm[:ss]) fed after --now
        #[arg(long = "then", value_parser = parse_clock_arg)]
        samples: Vec<i64>,

        /// How the live timer is shown
        #[arg(long, value_enum, default_value = "count-down")]
        timer_type: TimerTypeArg,
    },

    /// Show which playback controls are available
    Controls {
        /// Rundown JSON file
        input: PathBuf,

        /// ID of the loaded event
        #[arg(long)]
        selected: Option<String>,

        /// Playback state
        #[arg(long, value_enum, default_value = "stop")]
        playback: PlaybackArg,

        /// Phase of the live timer
        #[arg(long, value_enum, default_value = "default")]
        phase: PhaseArg,
    },
}

/// Clock and playback state shared by the status and follow commands
#[derive(Args)]
struct ClockArgs {
    /// Wall clock (hh:mm[:ss])
    #[arg(long, value_parser = parse_clock_arg)]
    now: i64,

    /// Running offset in milliseconds, negative when behind
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    offset: i64,

    /// Midnights crossed since the first event's day (defaults to the loaded event's day)
    #[arg(long)]
    day: Option<i64>,

    /// ID of the event loaded for playback
    #[arg(long)]
    selected: Option<String>,

    /// Playback state
    #[arg(long, value_enum, default_value = "play")]
    playback: PlaybackArg,

    /// Adjust countdowns by the running offset
    #[arg(long)]
    projected: bool,
}

impl ClockArgs {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::new(self.selected.as_deref().map(EventId::from), self.playback.into())
    }

    /// Day count from --day, or from the loaded event when omitted
    fn day(&self, rundown: &Rundown, snapshot: &PlaybackSnapshot) -> i64 {
        self.day.unwrap_or_else(|| {
            snapshot
                .selected()
                .and_then(|id| rundown.get(id))
                .map_or(0, |event| event.clock_day(self.now))
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlaybackArg {
    Armed,
    Play,
    Pause,
    Roll,
    Stop,
}

impl From<PlaybackArg> for Playback {
    fn from(arg: PlaybackArg) -> Self {
        match arg {
            PlaybackArg::Armed => Playback::Armed,
            PlaybackArg::Play => Playback::Play,
            PlaybackArg::Pause => Playback::Pause,
            PlaybackArg::Roll => Playback::Roll,
            PlaybackArg::Stop => Playback::Stop,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TimerTypeArg {
    CountDown,
    CountUp,
    Clock,
    None,
}

impl From<TimerTypeArg> for TimerType {
    fn from(arg: TimerTypeArg) -> Self {
        match arg {
            TimerTypeArg::CountDown => TimerType::CountDown,
            TimerTypeArg::CountUp => TimerType::CountUp,
            TimerTypeArg::Clock => TimerType::Clock,
            TimerTypeArg::None => TimerType::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PhaseArg {
    None,
    Default,
    Warning,
    Danger,
    Overtime,
    Pending,
}

impl From<PhaseArg> for TimerPhase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::None => TimerPhase::None,
            PhaseArg::Default => TimerPhase::Default,
            PhaseArg::Warning => TimerPhase::Warning,
            PhaseArg::Danger => TimerPhase::Danger,
            PhaseArg::Overtime => TimerPhase::Overtime,
            PhaseArg::Pending => TimerPhase::Pending,
        }
    }
}

fn parse_clock_arg(value: &str) -> std::result::Result<i64, String> {
    time::parse_clock(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => print_info(&loader::load_rundown(&input)?),

        Commands::Status {
            input,
            clock,
            hide_past,
        } => show_status(&loader::load_rundown(&input)?, &clock, hide_past),

        Commands::Layout {
            input,
            width,
            max_depth,
            label_px,
            hour_aligned,
            json,
        } => {
            let config = ViewConfig {
                container_width: width,
                max_lane_depth: max_depth,
                label_reserve: label_px.map_or(LabelReserve::Bar, |px_per_char| LabelReserve::Estimated { px_per_char }),
                ..ViewConfig::default()
            };
            show_layout(&loader::load_rundown(&input)?, &config, hour_aligned, json)?
        }

        Commands::Follow {
            input,
            id,
            clock,
            samples,
            timer_type,
        } => {
            let config = ViewConfig {
                show_projected: clock.projected,
                timer_type: timer_type.into(),
                ..ViewConfig::default()
            };
            follow_event(&loader::load_rundown(&input)?, EventId::new(id), &clock, &samples, &config)?
        }

        Commands::Controls {
            input,
            selected,
            playback,
            phase,
        } => show_controls(&loader::load_rundown(&input)?, selected, playback.into(), phase.into()),
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    // RUST_LOG still wins when set
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Formats an effective time as a wall clock, marking later days
fn format_effective(ms: i64) -> String {
    let day = ms.div_euclid(time::DAY_MS);
    if day == 0 {
        format_clock(ms)
    } else {
        format!("{} (+{}d)", format_clock(ms), day)
    }
}

fn print_info(rundown: &Rundown) {
    println!("\n=== Rundown Information ===");
    println!("Events: {}", rundown.len());

    if let Some(window) = ScheduleWindow::of(rundown.events()) {
        println!("Starts: {}", format_effective(window.start));
        println!("Ends: {}", format_effective(window.end));
        println!("Total: {}", format_duration(window.duration()));
    }

    let crossing = rundown.events().iter().filter(|e| e.crosses_midnight()).count();
    if crossing > 0 {
        println!("Events crossing midnight: {}", crossing);
    }

    println!("\n=== Events ===");
    for (i, event) in rundown.events().iter().enumerate() {
        println!(
            "  [{}] {} '{}' {} - {} ({}){}",
            i,
            event.id,
            event.title,
            format_effective(event.effective_start()),
            format_effective(event.effective_end()),
            format_duration(event.duration),
            if event.delay != 0 {
                format!(" delay {}", format_duration(event.delay))
            } else {
                String::new()
            }
        );
    }
}

fn show_status(rundown: &Rundown, clock: &ClockArgs, hide_past: bool) {
    let snapshot = clock.snapshot();
    let day = clock.day(rundown, &snapshot);
    let ctx = ResolveContext::new(ClockSample::new(clock.now, clock.offset), &snapshot)
        .on_day(day)
        .projected(clock.projected);
    debug!("resolving at {} on day {}", format_clock(clock.now), day);

    println!("Clock: {} (day {}), offset {}", format_clock(clock.now), day, format_duration(clock.offset));

    let cards = now_next(rundown, &ctx);
    println!(
        "Now: {}",
        cards.now.map_or("-".to_string(), |e| format!("{} '{}'", e.id, e.title))
    );
    if let Some(next) = cards.next {
        println!(
            "Next: {} '{}' in {}",
            next.id,
            next.title,
            format_duration(cards.time_to_next.unwrap_or_default())
        );
    }

    println!("\n=== Status ===");
    for event in visible_events(rundown, &ctx, hide_past) {
        let resolution = resolve(event, &ctx);
        let status = resolution.timeline_status();
        println!(
            "  {:<6} {} '{}' start in {}, end in {}{}",
            format!("{:?}", status),
            event.id,
            event.title,
            format_duration(resolution.time_to_start),
            format_duration(resolution.time_to_end),
            if status == TimelineStatus::Live {
                format!(" ({:.0}% elapsed)", progress(event, &ctx) * 100.0)
            } else {
                String::new()
            }
        );
    }
}

fn show_layout(rundown: &Rundown, config: &ViewConfig, hour_aligned: bool, json: bool) -> Result<()> {
    let Some(window) = ScheduleWindow::of(rundown.events()) else {
        println!("Rundown has no events");
        return Ok(());
    };
    let window = if hour_aligned { window.hour_aligned() } else { window };
    info!(
        "laying out {} events over {} - {}",
        rundown.len(),
        format_effective(window.start),
        format_effective(window.end)
    );

    let placements = place_events(rundown.events(), &window, config);

    if json {
        let output = serde_json::to_string_pretty(&placements).context("Failed to serialize placements")?;
        println!("{}", output);
        return Ok(());
    }

    println!("\n=== Ruler ===");
    for mark in hour_ruler(&window, config.container_width) {
        if let Some(label) = &mark.label {
            println!("  {:>8.1}px  {}", mark.left, label);
        }
    }

    println!("\n=== Lanes ===");
    for (event, placement) in rundown.events().iter().zip(&placements) {
        println!(
            "  lane {}{} {:>8.1}px +{:>7.1}px  {} '{}'",
            placement.lane,
            if placement.overflowed { "*" } else { " " },
            placement.left,
            placement.width,
            event.id,
            event.title
        );
    }

    let overflowed = placements.iter().filter(|p| p.overflowed).count();
    if overflowed > 0 {
        println!("\n* {} events did not fit in {} lanes", overflowed, config.max_lane_depth);
    }

    Ok(())
}

fn follow_event(rundown: &Rundown, id: EventId, clock: &ClockArgs, samples: &[i64], config: &ViewConfig) -> Result<()> {
    let event = rundown.get(&id).with_context(|| format!("Event not found: {}", id))?;
    let snapshot = clock.snapshot();

    let mut tracker = FollowTracker::starting_on(clock.day(rundown, &snapshot));
    tracker.follow(id);

    println!("Following {} '{}'", event.id, event.title);
    for now in std::iter::once(clock.now).chain(samples.iter().copied()) {
        let update = tracker.update(Some(event), ClockSample::new(now, clock.offset), &snapshot, config);
        let timer = match (update.status, update.timer) {
            (_, None) => "-".to_string(),
            (FollowStatus::Ended, Some(end)) => format_clock(end),
            (_, Some(value)) => format_duration(value),
        };
        println!(
            "  {} (day {})  {:<24} {}",
            format_clock(now),
            tracker.day(),
            update.status.message(),
            timer
        );
    }

    Ok(())
}

fn show_controls(rundown: &Rundown, selected: Option<String>, playback: Playback, phase: TimerPhase) {
    let position = selected.map(EventId::new).and_then(|id| rundown.index_of(&id));
    let state = derive_controls(&ControlInput {
        playback,
        position,
        total: rundown.len(),
        phase,
    });

    let flag = |disabled: bool| if disabled { "disabled" } else { "enabled" };
    println!("Go: {} ({})", state.go.label(), flag(state.disable_go));
    println!("Start: {}", flag(state.disable_start));
    println!("Pause: {}", flag(state.disable_pause));
    println!("Roll: {}", flag(state.disable_roll));
    println!("Stop: {}", flag(state.disable_stop));
    println!("Previous: {}", flag(state.disable_prev));
    println!("Next: {}", flag(state.disable_next));
    println!("Add time: {}", flag(state.disable_add_time));
}
