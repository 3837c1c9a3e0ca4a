//! Playback control state derived from the transport
//!
//! This is a projection, not a state machine: every flag is recomputed from
//! the current inputs. The transitions themselves belong to the transport.

use crate::playback::{Playback, TimerPhase};

/// Action behind the combined "go" control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GoAction {
    /// Start the armed event
    Start,
    /// Load and start the next event
    Next,
    /// Stop after the last event
    Finish,
}

impl GoAction {
    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            GoAction::Start => "Start",
            GoAction::Next => "Next",
            GoAction::Finish => "Finish",
        }
    }
}

/// Transport state the controls are derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInput {
    pub playback: Playback,
    /// Index of the loaded event in schedule order
    pub position: Option<usize>,
    /// Number of events in the rundown
    pub total: usize,
    pub phase: TimerPhase,
}

/// Which controls are available, and what "go" does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ControlState {
    pub disable_go: bool,
    pub disable_next: bool,
    pub disable_prev: bool,
    pub disable_start: bool,
    pub disable_pause: bool,
    pub disable_roll: bool,
    pub disable_stop: bool,
    pub disable_add_time: bool,
    pub go: GoAction,
}

/// Derives the control state from the transport
pub fn derive_controls(input: &ControlInput) -> ControlState {
    let no_events = input.total == 0;
    let is_first = input.position.map_or(true, |p| p == 0);
    let is_last = input.position.is_some_and(|p| p + 1 >= input.total);

    let rolling = input.playback == Playback::Roll;
    let stopped = input.playback == Playback::Stop;
    let armed = input.playback == Playback::Armed;

    let go = if armed || (stopped && !no_events) {
        GoAction::Start
    } else if is_last {
        GoAction::Finish
    } else {
        GoAction::Next
    };

    ControlState {
        disable_go: rolling || no_events,
        disable_next: rolling || no_events || is_last,
        disable_prev: rolling || no_events || is_first,
        disable_start: no_events || input.playback.is_playing(),
        disable_pause: input.playback != Playback::Play,
        disable_roll: no_events || rolling,
        disable_stop: stopped,
        disable_add_time: stopped || input.phase == TimerPhase::None,
        go,
    }
}
