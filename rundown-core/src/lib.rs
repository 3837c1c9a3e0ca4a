//! Rundown Core Library
//!
//! This library provides the timing engine behind a live rundown: it classifies
//! scheduled events against a clock/offset feed, packs events into timeline
//! lanes and tracks the countdown of a single followed event.
//!
//! Everything here is a pure computation over explicit inputs, except for
//! [`FollowTracker`], which owns a small piece of state that callers update on
//! every clock sample.

pub mod config;
pub mod controls;
pub mod countdown;
pub mod event;
pub mod layout;
pub mod playback;
pub mod status;
pub mod time;
pub mod timeline;

pub use config::{LabelReserve, ViewConfig};
pub use controls::{derive_controls, ControlInput, ControlState, GoAction};
pub use countdown::{FollowState, FollowTracker, FollowUpdate};
pub use event::{Event, EventId, Rundown};
pub use layout::{assign_lane, element_position, layout, place_events, LanePlacement, LaneTracker, Position};
pub use playback::{timer_by_type, ClockSample, Playback, PlaybackSnapshot, TimerPhase, TimerSnapshot, TimerType};
pub use status::{countdown, resolve, FollowStatus, Phase, Resolution, ResolveContext, TimelineStatus};
pub use time::{DayCursor, DAY_MS};
pub use timeline::{hour_ruler, now_next, progress, visible_events, NowNext, RulerMark, ScheduleWindow};

/// Result type for rundown-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rundown-core operations
///
/// Only the ingestion boundaries are fallible. Status resolution, layout and
/// countdown tracking normalize bad input instead of rejecting it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Time {value}ms for event '{id}' is outside a single day")]
    InvalidTime { id: String, value: i64 },

    #[error("Duplicate event ID: {0}")]
    DuplicateEventId(String),

    #[error("Event at position {0} has an empty ID")]
    EmptyEventId(usize),

    #[error("Invalid clock time: '{0}', expected hh:mm or hh:mm:ss")]
    InvalidClock(String),
}
