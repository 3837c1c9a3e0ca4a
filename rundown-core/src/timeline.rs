//! Timeline view helpers: schedule window, hour ruler and now/next cards

use crate::event::{Event, Rundown};
use crate::layout::element_position;
use crate::status::{resolve, Phase, ResolveContext};
use crate::time::{self, HOUR_MS};

/// Span of the effective axis shown by the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleWindow {
    pub start: i64,
    pub end: i64,
}

impl ScheduleWindow {
    /// Creates a new schedule window
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Window from the first effective start to the latest effective end.
    ///
    /// Returns `None` for an empty list. A window that would have no length is
    /// widened to one hour.
    pub fn of(events: &[Event]) -> Option<Self> {
        let start = events.iter().map(Event::effective_start).min()?;
        let end = events.iter().map(Event::effective_end).max()?;
        let end = if end > start { end } else { start + HOUR_MS };
        Some(Self { start, end })
    }

    /// Rounds the window outward to whole hours
    pub fn hour_aligned(self) -> Self {
        let start = self.start.div_euclid(HOUR_MS) * HOUR_MS;
        let end = (self.end + HOUR_MS - 1).div_euclid(HOUR_MS) * HOUR_MS;
        Self { start, end }
    }

    /// Length of the window in milliseconds
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// A tick on the hour ruler
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RulerMark {
    /// Time of day of the tick
    pub clock: i64,
    pub left: f64,
    /// `hh:00`, or `None` when the tick is too crowded to carry a label
    pub label: Option<String>,
}

/// Builds one ruler tick per whole hour inside the window
pub fn hour_ruler(window: &ScheduleWindow, container_width: f64) -> Vec<RulerMark> {
    let hours = window.duration() as f64 / HOUR_MS as f64;
    if hours <= 0.0 {
        return Vec::new();
    }

    let px_per_hour = container_width / hours;
    let label_step = if px_per_hour >= 40.0 {
        1
    } else if px_per_hour >= 20.0 {
        2
    } else if px_per_hour >= 10.0 {
        3
    } else {
        6
    };

    let first = (window.start + HOUR_MS - 1).div_euclid(HOUR_MS);
    let last = window.end.div_euclid(HOUR_MS);

    (first..=last)
        .map(|hour| {
            let at = hour * HOUR_MS;
            let clock = time::wrap_day(at);
            let position = element_position(window.start, window.end, at, 0, container_width);
            let hour_of_day = clock / HOUR_MS;
            RulerMark {
                clock,
                left: position.left,
                label: (hour_of_day % label_step == 0).then(|| format!("{:02}:00", hour_of_day)),
            }
        })
        .collect()
}

/// The event on air and the one after it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowNext<'a> {
    pub now: Option<&'a Event>,
    pub next: Option<&'a Event>,
    /// Countdown to the next event's start
    pub time_to_next: Option<i64>,
}

/// Picks the now/next cards.
///
/// `now` is the event loaded for playback. `next` follows it in schedule
/// order, or with nothing loaded, is the first event still ahead of the clock.
pub fn now_next<'a>(rundown: &'a Rundown, ctx: &ResolveContext<'_>) -> NowNext<'a> {
    let now = ctx.playback.selected().and_then(|id| rundown.get(id));

    let next = match now {
        Some(current) => rundown.next_after(&current.id),
        None => rundown
            .events()
            .iter()
            .find(|event| resolve(event, ctx).phase == Phase::Pending),
    };

    NowNext {
        now,
        next,
        time_to_next: next.map(|event| resolve(event, ctx).time_to_start),
    }
}

/// Elapsed fraction of an event's scheduled window, clamped to `[0, 1]`
pub fn progress(event: &Event, ctx: &ResolveContext<'_>) -> f64 {
    let start = event.effective_start();
    let end = event.effective_end();
    let now = ctx.now();

    if end <= start {
        return if now >= start { 1.0 } else { 0.0 };
    }
    ((now - start) as f64 / (end - start) as f64).clamp(0.0, 1.0)
}

/// Events to show, leaving out finished ones when `hide_past` is set
pub fn visible_events<'a>(rundown: &'a Rundown, ctx: &ResolveContext<'_>, hide_past: bool) -> Vec<&'a Event> {
    rundown
        .events()
        .iter()
        .filter(|event| !hide_past || resolve(event, ctx).phase != Phase::Ended)
        .collect()
}
