//! Countdown tracking for a single followed event
//!
//! A countdown view follows one event, which need not be the one loaded for
//! playback. The tracker keeps the follow target, the last reported status and
//! a [`DayCursor`], so a follow target scheduled after midnight keeps counting
//! down correctly while the clock crosses into the next day.
//!
//! The tracker is plain owned data. Hosts that update it from several threads
//! must wrap it in their own lock.

use crate::config::ViewConfig;
use crate::event::{Event, EventId};
use crate::playback::{ClockSample, PlaybackSnapshot};
use crate::status::{countdown, FollowStatus, ResolveContext};
use crate::time::DayCursor;

/// State of the followed event, as of the last update
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FollowState {
    pub followed_id: EventId,
    pub status: FollowStatus,
    /// Value shown on the countdown; its meaning depends on the status
    pub timer_value: Option<i64>,
}

/// Output of a single tracker update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FollowUpdate {
    pub status: FollowStatus,
    pub timer: Option<i64>,
}

impl FollowUpdate {
    fn idle() -> Self {
        Self::default()
    }
}

/// Follows one event through its lifecycle
#[derive(Debug, Clone, Default)]
pub struct FollowTracker {
    state: Option<FollowState>,
    cursor: DayCursor,
}

impl FollowTracker {
    /// Creates an idle tracker with the clock on day 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle tracker with the clock on the given day
    pub fn starting_on(day: i64) -> Self {
        Self {
            state: None,
            cursor: DayCursor::new(day),
        }
    }

    /// Starts following an event, discarding any previous countdown
    pub fn follow(&mut self, id: EventId) {
        if self.followed() == Some(&id) {
            return;
        }
        log::debug!("following event {}", id);
        self.state = Some(FollowState {
            followed_id: id,
            status: FollowStatus::ToStart,
            timer_value: None,
        });
    }

    /// Stops following
    pub fn unfollow(&mut self) {
        if let Some(state) = self.state.take() {
            log::debug!("stopped following event {}", state.followed_id);
        }
    }

    /// Returns the followed event ID
    pub fn followed(&self) -> Option<&EventId> {
        self.state.as_ref().map(|s| &s.followed_id)
    }

    /// Returns the state from the last update
    pub fn state(&self) -> Option<&FollowState> {
        self.state.as_ref()
    }

    /// Returns the clock's current day count
    pub fn day(&self) -> i64 {
        self.cursor.day()
    }

    /// Overrides the clock's day count, e.g. from [`Event::clock_day`] of the
    /// loaded event
    pub fn set_day(&mut self, day: i64) {
        self.cursor.set_day(day);
    }

    /// Feeds a clock sample and returns what the countdown should show.
    ///
    /// `event` is the caller's current copy of the followed event. Passing a
    /// different event, or none because it left the rundown, reports `Idle`
    /// without dropping the follow target.
    pub fn update(
        &mut self,
        event: Option<&Event>,
        clock: ClockSample,
        playback: &PlaybackSnapshot,
        config: &ViewConfig,
    ) -> FollowUpdate {
        let day = self.cursor.advance(clock.now);

        let Some(state) = self.state.as_mut() else {
            return FollowUpdate::idle();
        };

        let update = match event.filter(|e| e.id == state.followed_id) {
            Some(event) => {
                let ctx = ResolveContext::new(clock, playback)
                    .on_day(day)
                    .projected(config.show_projected)
                    .with_timer_type(config.timer_type);
                let (status, timer) = countdown(event, &ctx);
                FollowUpdate { status, timer }
            }
            None => FollowUpdate::idle(),
        };

        if update.status != state.status {
            log::debug!(
                "followed event {}: {:?} -> {:?}",
                state.followed_id,
                state.status,
                update.status
            );
        }
        state.status = update.status;
        state.timer_value = update.timer;
        update
    }
}
