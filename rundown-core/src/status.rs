//! Temporal status of events relative to the live clock
//!
//! The playback system is authoritative for which event is live. Clock
//! containment only classifies events that are *not* loaded, because a show
//! can run ahead of or behind its plan.

use crate::event::Event;
use crate::playback::{timer_by_type, ClockSample, Playback, PlaybackSnapshot, TimerType};
use crate::time;

/// Underlying phase of an event, shared by both status vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The clock has not reached the effective start
    Pending,
    /// Inside the scheduled window but not loaded for playback
    Due,
    /// Loaded for playback
    Loaded,
    /// Past the effective end and not loaded
    Ended,
}

/// Status vocabulary used by the timeline view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimelineStatus {
    Future,
    Due,
    Live,
    Done,
}

impl From<Phase> for TimelineStatus {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Pending => TimelineStatus::Future,
            Phase::Due => TimelineStatus::Due,
            Phase::Loaded => TimelineStatus::Live,
            Phase::Ended => TimelineStatus::Done,
        }
    }
}

/// Status vocabulary used by the countdown view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FollowStatus {
    /// Nothing is being followed
    #[default]
    Idle,
    ToStart,
    Waiting,
    Running,
    Ended,
}

impl FollowStatus {
    /// Message shown above the countdown
    pub fn message(self) -> &'static str {
        match self {
            FollowStatus::Idle => "",
            FollowStatus::ToStart => "Starts in",
            FollowStatus::Waiting => "Waiting for event start",
            FollowStatus::Running => "Event running",
            FollowStatus::Ended => "Event ended at",
        }
    }
}

/// Everything the resolver needs besides the event itself
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub clock: ClockSample,
    /// Number of midnights the clock has crossed since the first event's day
    pub day: i64,
    pub playback: &'a PlaybackSnapshot,
    /// Subtract the running offset from countdowns
    pub show_projected: bool,
    pub timer_type: TimerType,
}

impl<'a> ResolveContext<'a> {
    /// Creates a context on day 0 with planned (non-projected) times
    pub fn new(clock: ClockSample, playback: &'a PlaybackSnapshot) -> Self {
        Self {
            clock,
            day: 0,
            playback,
            show_projected: false,
            timer_type: TimerType::CountDown,
        }
    }

    /// Sets the clock's day count
    pub fn on_day(mut self, day: i64) -> Self {
        self.day = day;
        self
    }

    /// Sets whether countdowns include the running offset
    pub fn projected(mut self, show_projected: bool) -> Self {
        self.show_projected = show_projected;
        self
    }

    /// Sets the timer type used for loaded events
    pub fn with_timer_type(mut self, timer_type: TimerType) -> Self {
        self.timer_type = timer_type;
        self
    }

    /// Current time on the effective axis
    pub fn now(&self) -> i64 {
        time::on_day(self.clock.now, self.day)
    }

    fn projection(&self) -> i64 {
        if self.show_projected {
            self.clock.offset
        } else {
            0
        }
    }
}

/// Result of resolving one event against the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub phase: Phase,
    /// Signed time until the effective start
    pub time_to_start: i64,
    /// Signed time until the effective end
    pub time_to_end: i64,
}

impl Resolution {
    /// Returns the status in timeline vocabulary
    pub fn timeline_status(&self) -> TimelineStatus {
        self.phase.into()
    }
}

/// Classifies an event against the clock and the playback state
pub fn resolve(event: &Event, ctx: &ResolveContext<'_>) -> Resolution {
    let start = event.effective_start();
    let end = event.effective_end();
    let now = ctx.now();

    let phase = if ctx.playback.is_selected(&event.id) {
        Phase::Loaded
    } else if now < start {
        Phase::Pending
    } else if now <= end {
        Phase::Due
    } else {
        Phase::Ended
    };

    let projection = ctx.projection();
    Resolution {
        phase,
        time_to_start: start - now - projection,
        time_to_end: end - now - projection,
    }
}

/// Resolves an event in countdown vocabulary, with the value to display.
///
/// - `ToStart` shows the time until start.
/// - `Waiting` shows the live timer when the event is loaded but held, otherwise
///   its scheduled duration.
/// - `Running` shows the live timer projected by the timer type.
/// - `Ended` shows the scheduled end as a time of day.
pub fn countdown(event: &Event, ctx: &ResolveContext<'_>) -> (FollowStatus, Option<i64>) {
    let resolution = resolve(event, ctx);
    match resolution.phase {
        Phase::Pending => (FollowStatus::ToStart, Some(resolution.time_to_start)),
        Phase::Due => {
            let duration = event.effective_end() - event.effective_start();
            (FollowStatus::Waiting, Some(duration))
        }
        Phase::Loaded => {
            let live = timer_by_type(ctx.timer_type, &ctx.playback.timer);
            match ctx.playback.playback {
                Playback::Armed | Playback::Pause => {
                    let duration = event.effective_end() - event.effective_start();
                    (FollowStatus::Waiting, live.or(Some(duration)))
                }
                Playback::Play | Playback::Roll | Playback::Stop => (FollowStatus::Running, live),
            }
        }
        Phase::Ended => (FollowStatus::Ended, Some(event.scheduled_end_clock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use crate::playback::TimerSnapshot;
    use crate::time::DAY_MS;

    fn not_selected() -> PlaybackSnapshot {
        PlaybackSnapshot::new(Some(EventId::new("other")), Playback::Play)
    }

    #[test]
    fn test_countdown_to_start() {
        let event = Event::new("a", "", 10_000, 20_000);
        let playback = not_selected();
        let ctx = ResolveContext::new(ClockSample::new(1_000, 0), &playback);

        assert_eq!(countdown(&event, &ctx), (FollowStatus::ToStart, Some(9_000)));
        assert_eq!(resolve(&event, &ctx).timeline_status(), TimelineStatus::Future);
    }

    #[test]
    fn test_inside_window_but_not_selected_is_waiting() {
        let event = Event::new("a", "", 10_000, 20_000);
        let playback = not_selected();
        let ctx = ResolveContext::new(ClockSample::new(15_000, 0), &playback);

        let (status, timer) = countdown(&event, &ctx);
        assert_eq!(status, FollowStatus::Waiting);
        assert_eq!(timer, Some(10_000));
        assert_eq!(resolve(&event, &ctx).timeline_status(), TimelineStatus::Due);
    }

    #[test]
    fn test_midnight_crossing_event_is_not_done() {
        let event = Event::new("a", "", 10_000, 1_000);
        let playback = not_selected();
        let ctx = ResolveContext::new(ClockSample::new(15_000, 0), &playback);

        let (status, timer) = countdown(&event, &ctx);
        assert_eq!(status, FollowStatus::Waiting);
        assert_eq!(timer, Some(DAY_MS + 1_000 - 10_000));
        assert_eq!(resolve(&event, &ctx).timeline_status(), TimelineStatus::Due);
    }

    #[test]
    fn test_selected_event_wins_over_clock() {
        let event = Event::new("a", "", 10_000, 20_000);
        let timer = TimerSnapshot {
            current: Some(3_000),
            elapsed: Some(7_000),
            ..TimerSnapshot::default()
        };
        let playback = PlaybackSnapshot::new(Some(EventId::new("a")), Playback::Play).with_timer(timer);

        // long after the scheduled end
        let ctx = ResolveContext::new(ClockSample::new(50_000, 0), &playback);
        assert_eq!(resolve(&event, &ctx).timeline_status(), TimelineStatus::Live);
        assert_eq!(countdown(&event, &ctx), (FollowStatus::Running, Some(3_000)));

        let ctx = ctx.with_timer_type(TimerType::CountUp);
        assert_eq!(countdown(&event, &ctx), (FollowStatus::Running, Some(7_000)));
    }

    #[test]
    fn test_armed_or_paused_selection_is_waiting() {
        let event = Event::new("a", "", 10_000, 20_000);
        let armed = PlaybackSnapshot::new(Some(EventId::new("a")), Playback::Armed);
        let ctx = ResolveContext::new(ClockSample::new(12_000, 0), &armed);
        // no live timer yet, falls back to the scheduled duration
        assert_eq!(countdown(&event, &ctx), (FollowStatus::Waiting, Some(10_000)));

        let paused = PlaybackSnapshot::new(Some(EventId::new("a")), Playback::Pause).with_timer(TimerSnapshot {
            current: Some(4_000),
            ..TimerSnapshot::default()
        });
        let ctx = ResolveContext::new(ClockSample::new(12_000, 0), &paused);
        assert_eq!(countdown(&event, &ctx), (FollowStatus::Waiting, Some(4_000)));
    }

    #[test]
    fn test_ended_reports_scheduled_end() {
        let event = Event::new("a", "", 10_000, 20_000).with_delay(2_000);
        let playback = not_selected();
        let ctx = ResolveContext::new(ClockSample::new(30_000, 0), &playback);

        assert_eq!(countdown(&event, &ctx), (FollowStatus::Ended, Some(22_000)));
        assert_eq!(resolve(&event, &ctx).timeline_status(), TimelineStatus::Done);
    }

    #[test]
    fn test_projected_offset_toggle() {
        let event = Event::new("a", "", 10_000, 20_000);
        let playback = not_selected();
        let clock = ClockSample::new(1_000, -2_500);

        let planned = ResolveContext::new(clock, &playback);
        assert_eq!(resolve(&event, &planned).time_to_start, 9_000);

        let projected = planned.projected(true);
        assert_eq!(resolve(&event, &projected).time_to_start, 10_000 - 1_000 + 2_500);
        assert_eq!(resolve(&event, &projected).time_to_end, 20_000 - 1_000 + 2_500);
    }

    #[test]
    fn test_day_count_moves_clock_forward() {
        let event = Event::new("a", "", 10_000, 20_000).with_day_offset(1);
        let playback = not_selected();

        let today = ResolveContext::new(ClockSample::new(15_000, 0), &playback);
        assert_eq!(resolve(&event, &today).phase, Phase::Pending);
        assert_eq!(resolve(&event, &today).time_to_start, DAY_MS - 5_000);

        let tomorrow = today.on_day(1);
        assert_eq!(resolve(&event, &tomorrow).phase, Phase::Due);
    }

    #[test]
    fn test_malformed_event_does_not_panic() {
        let event = Event::new("a", "", 10_000, 20_000).with_duration(-1);
        let playback = not_selected();
        let ctx = ResolveContext::new(ClockSample::new(10_000, 0), &playback);
        let resolution = resolve(&event, &ctx);
        assert_eq!(resolution.phase, Phase::Due);
        assert_eq!(resolution.time_to_end, 0);
    }

    #[test]
    fn test_stopped_playback_falls_back_to_clock() {
        let event = Event::new("a", "", 10_000, 20_000);
        let playback = PlaybackSnapshot::new(Some(EventId::new("a")), Playback::Stop);
        let ctx = ResolveContext::new(ClockSample::new(25_000, 0), &playback);
        assert_eq!(resolve(&event, &ctx).timeline_status(), TimelineStatus::Done);
    }
}
