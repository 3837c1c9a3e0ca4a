//! Timeline layout: pixel positions and lane packing
//!
//! Events are mapped linearly from the schedule window onto the container
//! width, then packed greedily into a bounded number of lanes. Packing is a
//! single left-to-right pass in schedule order; an event that finds no free
//! lane within the depth limit goes to lane 0 and is flagged as overflowed.

use crate::config::ViewConfig;
use crate::event::{Event, EventId};
use crate::time::DAY_MS;
use crate::timeline::ScheduleWindow;

/// Horizontal placement of a bar in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub left: f64,
    pub width: f64,
}

/// Placement of one event on the timeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LanePlacement {
    pub event_id: EventId,
    pub left: f64,
    pub width: f64,
    /// 0-based lane index
    pub lane: usize,
    /// Set when no lane was free and the event fell back to lane 0
    pub overflowed: bool,
}

/// Maps an event onto the container width.
///
/// A schedule end earlier than its start is taken to be on the next day. A
/// zero-length schedule yields an empty position.
pub fn element_position(
    schedule_start: i64,
    schedule_end: i64,
    event_start: i64,
    event_duration: i64,
    container_width: f64,
) -> Position {
    let schedule_end = if schedule_end < schedule_start {
        schedule_end + DAY_MS
    } else {
        schedule_end
    };

    let total = (schedule_end - schedule_start) as f64;
    if total <= 0.0 {
        return Position { left: 0.0, width: 0.0 };
    }

    Position {
        left: (event_start - schedule_start) as f64 / total * container_width,
        width: event_duration as f64 / total * container_width,
    }
}

/// Maps a list of `(start, duration)` pairs onto the container width
pub fn layout(items: &[(i64, i64)], schedule_start: i64, schedule_end: i64, container_width: f64) -> Vec<Position> {
    items
        .iter()
        .map(|&(start, duration)| element_position(schedule_start, schedule_end, start, duration, container_width))
        .collect()
}

/// Returns the first lane that is empty or whose right edge ends before `left`.
///
/// Falls back to lane 0 when every lane is occupied.
pub fn assign_lane(right_most_per_lane: &[Option<f64>], left: f64) -> usize {
    free_lane(right_most_per_lane, left).unwrap_or(0)
}

fn free_lane(right_most_per_lane: &[Option<f64>], left: f64) -> Option<usize> {
    right_most_per_lane.iter().position(|edge| match edge {
        Some(right) => *right < left,
        None => true,
    })
}

/// Right-most occupied pixel of each lane, built up during a layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct LaneTracker {
    right_most: Vec<Option<f64>>,
}

impl LaneTracker {
    /// Creates a tracker with `max_depth` empty lanes (at least one)
    pub fn new(max_depth: usize) -> Self {
        Self {
            right_most: vec![None; max_depth.max(1)],
        }
    }

    /// Places a bar starting at `left` that occupies up to `right`.
    ///
    /// Returns the lane and whether the placement overflowed into lane 0.
    pub fn place(&mut self, left: f64, right: f64) -> (usize, bool) {
        let (lane, overflowed) = match free_lane(&self.right_most, left) {
            Some(lane) => (lane, false),
            None => (0, true),
        };

        let edge = &mut self.right_most[lane];
        *edge = Some(edge.map_or(right, |existing| existing.max(right)));
        (lane, overflowed)
    }

    /// Returns the right-most edge of every lane
    pub fn right_most(&self) -> &[Option<f64>] {
        &self.right_most
    }
}

/// Places events on the timeline and assigns each a lane.
///
/// Events are processed in the order given, which should be schedule order.
pub fn place_events(events: &[Event], window: &ScheduleWindow, config: &ViewConfig) -> Vec<LanePlacement> {
    let mut lanes = LaneTracker::new(config.max_lane_depth);

    events
        .iter()
        .map(|event| {
            let start = event.effective_start();
            let duration = event.effective_end() - start;
            let position = element_position(window.start, window.end, start, duration, config.container_width);

            let reserved = config.label_reserve.reserved_width(position.width, &event.title);
            let (lane, overflowed) = lanes.place(position.left, position.left + reserved);
            if overflowed {
                log::trace!("no free lane for event {}, falling back to lane 0", event.id);
            }

            LanePlacement {
                event_id: event.id.clone(),
                left: position.left,
                width: position.width,
                lane,
                overflowed,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelReserve;
    use proptest::prelude::*;

    fn events_from(spans: &[(i64, i64)]) -> Vec<Event> {
        spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| Event::new(format!("e{}", i), format!("Event {}", i), start, end))
            .collect()
    }

    #[test]
    fn test_full_width_single_event() {
        let position = element_position(0, 3_600_000, 0, 3_600_000, 640.0);
        assert_eq!(position, Position { left: 0.0, width: 640.0 });
    }

    #[test]
    fn test_position_is_linear() {
        let position = element_position(1_000, 11_000, 6_000, 2_500, 200.0);
        assert_eq!(position, Position { left: 100.0, width: 50.0 });
    }

    #[test]
    fn test_schedule_end_before_start_wraps() {
        let position = element_position(DAY_MS - 1_000, 1_000, DAY_MS - 1_000, 1_000, 100.0);
        assert_eq!(position, Position { left: 0.0, width: 50.0 });
    }

    #[test]
    fn test_empty_schedule() {
        let position = element_position(5_000, 5_000, 5_000, 1_000, 100.0);
        assert_eq!(position, Position { left: 0.0, width: 0.0 });
    }

    #[test]
    fn test_assign_lane() {
        assert_eq!(assign_lane(&[None, None], 10.0), 0);
        assert_eq!(assign_lane(&[Some(20.0), None], 10.0), 1);
        assert_eq!(assign_lane(&[Some(20.0), Some(5.0)], 10.0), 1);
        // touching edges collide
        assert_eq!(assign_lane(&[Some(10.0), Some(30.0), None], 10.0), 2);
        assert_eq!(assign_lane(&[Some(20.0), Some(30.0)], 10.0), 0);
    }

    #[test]
    fn test_sixth_overlapping_event_falls_back_to_lane_zero() {
        let events = events_from(&[(0, 10_000); 7]);
        let window = ScheduleWindow::new(0, 10_000);
        let placements = place_events(&events, &window, &ViewConfig::default());

        let lanes: Vec<usize> = placements.iter().map(|p| p.lane).collect();
        assert_eq!(lanes, vec![0, 1, 2, 3, 4, 0, 0]);
        assert!(placements[..5].iter().all(|p| !p.overflowed));
        assert!(placements[5..].iter().all(|p| p.overflowed));
    }

    #[test]
    fn test_sequential_events_share_lane() {
        let events = events_from(&[(0, 1_000), (2_000, 3_000), (4_000, 5_000)]);
        let window = ScheduleWindow::new(0, 5_000);
        let placements = place_events(&events, &window, &ViewConfig::default());
        assert!(placements.iter().all(|p| p.lane == 0));
    }

    #[test]
    fn test_back_to_back_events_use_next_lane() {
        let events = events_from(&[(0, 1_000), (1_000, 2_000)]);
        let window = ScheduleWindow::new(0, 2_000);
        let placements = place_events(&events, &window, &ViewConfig::default());
        assert_eq!(placements[1].lane, 1);
    }

    #[test]
    fn test_label_reserve_pushes_short_events_apart() {
        let events = events_from(&[(0, 1_000), (2_000, 3_000)]);
        let window = ScheduleWindow::new(0, 10_000);

        let bar = place_events(&events, &window, &ViewConfig::default());
        assert_eq!(bar[1].lane, 0);

        let config = ViewConfig {
            label_reserve: LabelReserve::Estimated { px_per_char: 40.0 },
            ..ViewConfig::default()
        };
        let labelled = place_events(&events, &window, &config);
        assert_eq!(labelled[1].lane, 1);
        // geometry is unaffected by the reservation
        assert_eq!(labelled[1].width, bar[1].width);
    }

    #[test]
    fn test_layout_maps_pairs() {
        let positions = layout(&[(0, 500), (500, 500)], 0, 1_000, 10.0);
        assert_eq!(
            positions,
            vec![Position { left: 0.0, width: 5.0 }, Position { left: 5.0, width: 5.0 }]
        );
    }

    fn arb_spans() -> impl Strategy<Value = Vec<(i64, i64, usize)>> {
        prop::collection::vec((0i64..80_000, 0i64..20_000, 0usize..24), 0..60).prop_map(|mut spans| {
            spans.sort_by_key(|&(start, _, _)| start);
            spans
        })
    }

    fn arb_events() -> impl Strategy<Value = Vec<Event>> {
        arb_spans().prop_map(|spans| {
            spans
                .into_iter()
                .enumerate()
                .map(|(i, (start, duration, title_len))| {
                    Event::new(format!("e{}", i), "x".repeat(title_len), start, start + duration)
                })
                .collect()
        })
    }

    fn arb_config() -> impl Strategy<Value = ViewConfig> {
        (100.0f64..2_000.0, 1usize..8, prop::option::of(1.0f64..12.0)).prop_map(|(width, depth, px)| ViewConfig {
            container_width: width,
            max_lane_depth: depth,
            label_reserve: px.map_or(LabelReserve::Bar, |px_per_char| LabelReserve::Estimated { px_per_char }),
            ..ViewConfig::default()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Bars placed without overflow never overlap earlier bars in their lane.
        #[test]
        fn lanes_never_overlap(events in arb_events(), config in arb_config()) {
            let window = ScheduleWindow::new(0, 100_000);
            let placements = place_events(&events, &window, &config);

            for (j, later) in placements.iter().enumerate() {
                if later.overflowed {
                    continue;
                }
                for earlier in placements[..j].iter().filter(|p| p.lane == later.lane) {
                    prop_assert!(earlier.left + earlier.width <= later.left);
                }
            }
        }

        /// Lane indices stay below the depth limit and overflow always means lane 0.
        #[test]
        fn lane_depth_is_bounded(events in arb_events(), config in arb_config()) {
            let window = ScheduleWindow::new(0, 100_000);
            for placement in place_events(&events, &window, &config) {
                prop_assert!(placement.lane < config.max_lane_depth);
                if placement.overflowed {
                    prop_assert_eq!(placement.lane, 0);
                }
            }
        }

        #[test]
        fn full_width_single_event(duration in 1i64..(2 * DAY_MS), width in 1.0f64..10_000.0) {
            let position = element_position(0, duration, 0, duration, width);
            prop_assert_eq!(position, Position { left: 0.0, width });
        }

        #[test]
        fn layout_is_idempotent(events in arb_events(), config in arb_config()) {
            let window = ScheduleWindow::new(0, 100_000);
            let first = place_events(&events, &window, &config);
            let second = place_events(&events, &window, &config);
            prop_assert_eq!(first, second);
        }
    }
}
