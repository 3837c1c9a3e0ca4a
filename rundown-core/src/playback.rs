//! Inputs from the clock feed and the external playback system
//!
//! None of these types are produced by the engine. They are snapshots handed in
//! by the host on every update and are never mutated.

use crate::event::EventId;

/// A single sample from the clock/offset feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockSample {
    /// Milliseconds since local midnight
    pub now: i64,
    /// Signed drift from plan; negative means running behind
    pub offset: i64,
}

impl ClockSample {
    /// Creates a new clock sample
    pub fn new(now: i64, offset: i64) -> Self {
        Self { now, offset }
    }
}

/// Playback state reported by the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Playback {
    /// An event is loaded but not started
    Armed,
    Play,
    Pause,
    /// Events start and stop by the clock
    Roll,
    #[default]
    Stop,
}

impl Playback {
    /// Checks if the timer is advancing
    pub fn is_playing(self) -> bool {
        matches!(self, Playback::Play | Playback::Roll)
    }
}

/// How a live timer is presented to viewers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TimerType {
    /// Remaining time
    #[default]
    CountDown,
    /// Elapsed time
    CountUp,
    /// Wall clock
    Clock,
    /// No timer shown
    None,
}

/// Phase of the live timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimerPhase {
    /// No timer loaded
    #[default]
    None,
    Default,
    Warning,
    Danger,
    Overtime,
    /// Waiting for a roll start
    Pending,
}

/// Live timer state pushed by the playback system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerSnapshot {
    /// Remaining time of the loaded event
    pub current: Option<i64>,
    /// Elapsed time of the loaded event
    pub elapsed: Option<i64>,
    /// Duration of the loaded event
    pub duration: Option<i64>,
    /// Wall clock at the time of the snapshot
    pub clock: i64,
    pub phase: TimerPhase,
}

/// Projects a live timer onto the value shown for the given timer type
pub fn timer_by_type(timer_type: TimerType, timer: &TimerSnapshot) -> Option<i64> {
    match timer_type {
        TimerType::CountDown => timer.current,
        TimerType::CountUp => timer.elapsed.map(i64::abs),
        TimerType::Clock => Some(timer.clock),
        TimerType::None => None,
    }
}

/// Authoritative playback state: which event is loaded and how it is running
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackSnapshot {
    /// Event loaded for playback, if any
    pub selected_id: Option<EventId>,
    pub playback: Playback,
    pub timer: TimerSnapshot,
}

impl PlaybackSnapshot {
    /// Creates a snapshot with an idle timer
    pub fn new(selected_id: Option<EventId>, playback: Playback) -> Self {
        Self {
            selected_id,
            playback,
            timer: TimerSnapshot::default(),
        }
    }

    /// Sets the live timer
    pub fn with_timer(mut self, timer: TimerSnapshot) -> Self {
        self.timer = timer;
        self
    }

    /// Returns the loaded event, ignoring stale selections while stopped
    pub fn selected(&self) -> Option<&EventId> {
        match self.playback {
            Playback::Stop => None,
            _ => self.selected_id.as_ref(),
        }
    }

    /// Checks if the given event is the one loaded for playback
    pub fn is_selected(&self, id: &EventId) -> bool {
        self.selected() == Some(id)
    }
}
