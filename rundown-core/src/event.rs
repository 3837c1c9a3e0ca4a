//! Event and rundown data structures

use crate::time::{self, HALF_DAY_MS};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// Opaque identifier of a rundown event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EventId(String);

impl EventId {
    /// Creates a new event ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single scheduled segment of a rundown
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Event {
    /// Unique identifier for this event
    pub id: EventId,
    /// Display title
    pub title: String,
    /// Scheduled start in milliseconds since midnight
    pub time_start: i64,
    /// Scheduled end in milliseconds since midnight
    pub time_end: i64,
    /// Scheduled duration in milliseconds
    pub duration: i64,
    /// Signed delay applied to both start and end
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay: i64,
    /// Number of days this event is displaced from the first event
    #[cfg_attr(feature = "serde", serde(default))]
    pub day_offset: i64,
    /// Display colour, as given by the rundown source
    #[cfg_attr(feature = "serde", serde(default))]
    pub colour: String,
}

impl Event {
    /// Creates a new event, deriving its duration from start and end
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, time_start: i64, time_end: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time_start,
            time_end,
            duration: time::span(time_start, time_end),
            delay: 0,
            day_offset: 0,
            colour: String::new(),
        }
    }

    /// Sets the delay
    pub fn with_delay(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the day offset
    pub fn with_day_offset(mut self, day_offset: i64) -> Self {
        self.day_offset = day_offset;
        self
    }

    /// Overrides the derived duration with an authoritative one
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the colour
    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = colour.into();
        self
    }

    /// Checks if the scheduled end falls on the next calendar day
    pub fn crosses_midnight(&self) -> bool {
        self.time_end < self.time_start
    }

    /// Start on the effective axis, including day offset and delay
    pub fn effective_start(&self) -> i64 {
        time::on_day(self.time_start, self.day_offset) + self.delay
    }

    /// End on the effective axis.
    ///
    /// A negative duration is malformed input and collapses to a zero-length
    /// event at the effective start.
    pub fn effective_end(&self) -> i64 {
        let start = self.effective_start();
        if self.duration < 0 {
            log::debug!(
                "event {} has negative duration {}ms, treating as zero-length",
                self.id,
                self.duration
            );
            return start;
        }
        start + self.duration
    }

    /// Scheduled end as a time of day, including delay
    pub fn scheduled_end_clock(&self) -> i64 {
        time::wrap_day(self.effective_end())
    }

    /// Returns the day the clock is on, assuming `now` lies within half a day of
    /// this event's start.
    ///
    /// Used to place a bare wall-clock sample on the effective axis when this
    /// event is the one loaded for playback.
    pub fn clock_day(&self, now: i64) -> i64 {
        let ahead = self.time_start - now;
        if ahead > HALF_DAY_MS {
            self.day_offset + 1
        } else if ahead < -HALF_DAY_MS {
            self.day_offset - 1
        } else {
            self.day_offset
        }
    }
}

/// Accumulator for assigning day offsets in schedule order
#[derive(Debug, Clone, Copy, Default)]
struct DayFold {
    previous_start: Option<i64>,
    previous_crossed: bool,
    day: i64,
}

impl DayFold {
    fn step(self, event: &Event) -> Self {
        let rolled = match self.previous_start {
            Some(previous_start) => event.time_start < previous_start || self.previous_crossed,
            None => false,
        };
        Self {
            previous_start: Some(event.time_start),
            previous_crossed: event.crosses_midnight(),
            day: if rolled { self.day + 1 } else { self.day },
        }
    }
}

/// A validated, ordered sequence of events
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rundown {
    events: Vec<Event>,
}

impl Rundown {
    /// Creates a rundown from events in schedule order.
    ///
    /// Validates IDs and times, then recomputes every event's day offset from
    /// the order of start times.
    pub fn new(mut events: Vec<Event>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(events.len());
        for (index, event) in events.iter().enumerate() {
            if event.id.as_str().is_empty() {
                return Err(Error::EmptyEventId(index));
            }
            if !seen.insert(event.id.clone()) {
                return Err(Error::DuplicateEventId(event.id.to_string()));
            }
            for value in [event.time_start, event.time_end] {
                if !time::is_time_of_day(value) {
                    return Err(Error::InvalidTime {
                        id: event.id.to_string(),
                        value,
                    });
                }
            }
        }

        assign_day_offsets(&mut events);
        Ok(Self { events })
    }

    /// Returns the events in schedule order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Gets an event by ID
    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Returns the position of an event in schedule order
    pub fn index_of(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }

    /// Returns the event scheduled after the given one
    pub fn next_after(&self, id: &EventId) -> Option<&Event> {
        self.index_of(id).and_then(|index| self.events.get(index + 1))
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Checks if the rundown has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Assigns day offsets so effective starts never decrease.
///
/// A day is added whenever an event starts earlier in the day than its
/// predecessor, or when the predecessor ran past midnight.
pub fn assign_day_offsets(events: &mut [Event]) {
    events.iter_mut().fold(DayFold::default(), |fold, event| {
        let fold = fold.step(event);
        event.day_offset = fold.day;
        fold
    });
}
